//! Connection pairing loop.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::connection::{Connection, ConnectionError};
use crate::game_match::{GameMatch, Participant};
use crate::history::ResultLog;
use crate::protocol::ServerMessage;
use crate::registry::{MatchHandle, MatchRegistry};

/// Accepts connections two at a time and launches a match for each pair.
#[derive(Debug)]
pub struct Acceptor {
    listener: TcpListener,
    registry: MatchRegistry,
    results: ResultLog,
}

impl Acceptor {
    /// Binds the listener. This is the only fatal server error.
    #[instrument(skip(config, registry, results), fields(addr = %config.bind_addr()))]
    pub async fn bind(
        config: &ServerConfig,
        registry: MatchRegistry,
        results: ResultLog,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(config.bind_addr()).await?;
        info!(local_addr = ?listener.local_addr().ok(), "Listening");
        Ok(Self {
            listener,
            registry,
            results,
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Pairs connections forever. Each match runs on its own task.
    ///
    /// Failures while seating a player discard that attempt (closing any
    /// connection already accepted for it) and the loop starts over.
    #[instrument(skip(self))]
    pub async fn run(self) {
        loop {
            let match_id = Uuid::new_v4().to_string();

            let mut first = match self.seat(1).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(%match_id, error = %e, "Player 1 not seated");
                    continue;
                }
            };

            let second = match self.seat(2).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(%match_id, error = %e, "Player 2 not seated, dropping player 1");
                    first.close().await;
                    continue;
                }
            };

            self.launch(match_id, first, second).await;
        }
    }

    /// Accepts one connection and reads its username.
    #[instrument(skip(self))]
    async fn seat(&self, seat: u8) -> Result<Participant<TcpStream>, ConnectionError> {
        let (stream, addr) = self.listener.accept().await?;
        info!(%addr, "Connection accepted");

        let mut conn = Connection::new(stream, addr.to_string());
        let name = match prompt_username(&mut conn).await {
            Ok(name) => name,
            Err(e) => {
                conn.close().await;
                return Err(e);
            }
        };

        info!(%addr, username = %name, "Player seated");
        Ok(Participant::new(conn, name))
    }

    #[instrument(skip_all, fields(%match_id))]
    async fn launch(
        &self,
        match_id: String,
        first: Participant<TcpStream>,
        second: Participant<TcpStream>,
    ) {
        let player1 = first.name().to_string();
        let player2 = second.name().to_string();
        let game = GameMatch::new(match_id.clone(), first, second, self.results.clone());

        let task = tokio::spawn({
            let match_id = match_id.clone();
            async move {
                info!(%match_id, "Game is running");
                let report = game.run().await;
                info!(%match_id, state = ?report.state, "Game has ended");
            }
        });

        let handle = MatchHandle::new(match_id, player1, player2, task.abort_handle());
        if let Err(e) = self.registry.register(handle).await {
            error!(error = %e, "Registry rejected match id");
        }
    }
}

async fn prompt_username(conn: &mut Connection<TcpStream>) -> Result<String, ConnectionError> {
    conn.send_message(&ServerMessage::UsernamePrompt).await?;
    conn.read_line().await
}
