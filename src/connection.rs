//! Line-framed connection to one participant.

use derive_more::{Display, Error};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf,
    WriteHalf,
};
use tracing::{debug, instrument};

use crate::protocol::ServerMessage;

/// Longest accepted line, newline included.
pub const MAX_LINE_LEN: u64 = 4096;

/// Failure on a participant's connection. Fatal to the match or pairing
/// attempt that owns the connection.
#[derive(Debug, Display, Error)]
pub enum ConnectionError {
    /// Peer closed the stream before sending a full line.
    #[display("connection closed by peer")]
    Closed,
    /// Peer sent more than [`MAX_LINE_LEN`] bytes without a newline.
    #[display("line exceeds {MAX_LINE_LEN} bytes")]
    LineTooLong,
    /// Underlying transport error.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for ConnectionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// One participant's stream, split into a buffered line reader and a writer.
///
/// Generic over the transport so matches run the same over TCP and over
/// in-memory pipes.
#[derive(Debug)]
pub struct Connection<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    peer: String,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    /// Wraps a stream; `peer` is only used for logging.
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(reader),
            writer,
            peer: peer.into(),
        }
    }

    /// Peer label given at construction.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Writes raw text and flushes.
    #[instrument(skip(self, text), fields(peer = %self.peer, len = text.len()))]
    pub async fn send(&mut self, text: &str) -> Result<(), ConnectionError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Writes a protocol message and flushes.
    #[instrument(skip(self, message), fields(peer = %self.peer))]
    pub async fn send_message(&mut self, message: &ServerMessage) -> Result<(), ConnectionError> {
        self.send(&message.to_string()).await
    }

    /// Reads one line, without its trailing `\n` or `\r\n`.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD, so garbage
    /// input reaches the caller as text it can reject.
    ///
    /// # Errors
    ///
    /// [`ConnectionError::Closed`] on end of stream, including a final line
    /// with no newline; [`ConnectionError::LineTooLong`] past
    /// [`MAX_LINE_LEN`].
    #[instrument(skip(self), fields(peer = %self.peer))]
    pub async fn read_line(&mut self) -> Result<String, ConnectionError> {
        let mut buf = Vec::new();
        let read = (&mut self.reader)
            .take(MAX_LINE_LEN)
            .read_until(b'\n', &mut buf)
            .await?;

        if read == 0 {
            debug!("peer closed stream");
            return Err(ConnectionError::Closed);
        }
        if buf.last() != Some(&b'\n') {
            return Err(if read as u64 >= MAX_LINE_LEN {
                ConnectionError::LineTooLong
            } else {
                ConnectionError::Closed
            });
        }

        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        let line = String::from_utf8_lossy(&buf).into_owned();
        debug!(len = line.len(), "line received");
        Ok(line)
    }

    /// Shuts down the write side so the peer sees end of stream.
    #[instrument(skip(self), fields(peer = %self.peer))]
    pub async fn close(&mut self) {
        if let Err(e) = self.writer.shutdown().await {
            debug!(error = %e, "shutdown failed");
        }
    }
}
