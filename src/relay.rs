//! Terminal client relay.
//!
//! Two tasks share one connection: a listener printing server text and a
//! forwarder sending typed lines. The listener decides when the session is
//! over and signals the forwarder through a watch channel.

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use crate::connection::ConnectionError;
use crate::protocol::{GAME_OVER_MARKER, PROMPT_DELIMITER};

/// Why the relay stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayExit {
    /// The server announced the end of the game.
    GameOver,
    /// The server closed the connection without announcing an outcome.
    ServerClosed,
}

/// Connects to `addr` and relays between the terminal and the server.
#[instrument]
pub async fn connect(addr: &str) -> Result<RelayExit, ConnectionError> {
    let stream = TcpStream::connect(addr).await?;
    info!("Connected to server");
    relay(stream, spawn_stdin_reader(), tokio::io::stdout()).await
}

/// Reads stdin lines on a dedicated thread.
///
/// Blocking stdin reads would otherwise pin a runtime worker; the thread is
/// left behind when the relay returns and dies with the process.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Runs the relay over an established stream.
///
/// `input` yields lines typed by the user; `output` receives server text.
/// Returns once the server ends the game or closes the connection.
pub async fn relay<S, O>(
    stream: S,
    input: mpsc::Receiver<String>,
    output: O,
) -> Result<RelayExit, ConnectionError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
    O: AsyncWrite + Unpin + Send + 'static,
{
    let (reader, writer) = tokio::io::split(stream);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let listener = tokio::spawn(listen(reader, output));
    let forwarder = tokio::spawn(forward(input, writer, shutdown_rx));

    let exit = match listener.await {
        Ok(result) => result,
        Err(e) => Err(ConnectionError::Io(std::io::Error::other(e))),
    };

    // The forwarder may already be gone if input ended first.
    let _ = shutdown_tx.send(true);
    match forwarder.await {
        Ok(Err(e)) => debug!(error = %e, "Forwarder ended with error"),
        Err(e) => warn!(error = %e, "Forwarder task failed"),
        Ok(Ok(())) => {}
    }

    exit
}

async fn listen<S, O>(reader: ReadHalf<S>, mut output: O) -> Result<RelayExit, ConnectionError>
where
    S: AsyncRead,
    O: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);

    let mut greeting = Vec::new();
    if reader.read_until(PROMPT_DELIMITER, &mut greeting).await? == 0 {
        return Ok(RelayExit::ServerClosed);
    }
    output.write_all(&greeting).await?;
    output.write_all(b" ").await?;
    output.flush().await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;

        if line.contains(GAME_OVER_MARKER) {
            debug!("Game over marker seen");
            return Ok(RelayExit::GameOver);
        }
    }

    Ok(RelayExit::ServerClosed)
}

async fn forward<S>(
    mut input: mpsc::Receiver<String>,
    mut writer: WriteHalf<S>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), ConnectionError>
where
    S: AsyncWrite,
{
    loop {
        tokio::select! {
            _ = shutdown.changed() => return Ok(()),
            line = input.recv() => match line {
                Some(line) => {
                    writer.write_all(line.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await?;
                }
                None => {
                    debug!("Input closed, half-closing connection");
                    writer.shutdown().await?;
                    return Ok(());
                }
            },
        }
    }
}
