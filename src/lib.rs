//! Strictly Arena library - networked two-player tic-tac-toe
//!
//! A TCP server pairs connections first-come first-served, runs each match
//! on its own task, and records finished matches in a JSON result log.
//!
//! # Architecture
//!
//! - **Acceptor**: accepts and seats two players, then launches a match
//! - **Match**: single-writer turn loop over a line-oriented protocol
//! - **Registry**: bookkeeping of every match started
//! - **History**: append-only result log, rewritten to disk on every append
//! - **Relay**: thin terminal client
//!
//! # Example
//!
//! ```no_run
//! use strictly_arena::{Acceptor, JsonResultStore, MatchRegistry, ResultLog, ServerConfig};
//!
//! # async fn example() -> std::io::Result<()> {
//! let config = ServerConfig::default();
//! let results = ResultLog::new(JsonResultStore::new(config.history_path()));
//! let acceptor = Acceptor::bind(&config, MatchRegistry::new(), results).await?;
//! acceptor.run().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod acceptor;
mod config;
mod connection;
mod game_match;
mod history;
mod protocol;
mod registry;
mod relay;

// Crate-level exports - Server
pub use acceptor::Acceptor;
pub use config::{ClientConfig, ConfigError, ServerConfig};

// Crate-level exports - Matches
pub use connection::{Connection, ConnectionError, MAX_LINE_LEN};
pub use game_match::{GameMatch, MatchReport, MatchState, Participant, Slot};
pub use registry::{DuplicateMatch, MatchHandle, MatchId, MatchRegistry};

// Crate-level exports - Result history
pub use history::{HistoryError, HistoryErrorKind, JsonResultStore, ResultLog, ResultSummary};

// Crate-level exports - Wire protocol
pub use protocol::{
    GAME_OVER_MARKER, MoveInput, PROMPT_DELIMITER, ParseMoveError, ServerMessage, parse_move,
};

// Crate-level exports - Client relay
pub use relay::{RelayExit, connect, relay, spawn_stdin_reader};

// Crate-level exports - Game types (tic-tac-toe)
pub use strictly_tictactoe::{Board, Cell, InvalidMove, Mark, Outcome, Square};
