//! Persisted record types.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strictly_tictactoe::{Board, Outcome};
use tracing::instrument;

/// Immutable summary of one finished match.
///
/// Field names are the JSON keys of the persisted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ResultSummary {
    game_id: String,
    player1: String,
    player2: String,
    winner: Outcome,
    finished: bool,
    board: Board,
}

impl ResultSummary {
    /// Summarises a match that reached a terminal outcome.
    #[instrument(skip(board))]
    pub fn completed(
        game_id: String,
        player1: String,
        player2: String,
        winner: Outcome,
        board: Board,
    ) -> Self {
        Self {
            game_id,
            player1,
            player2,
            winner,
            finished: true,
            board,
        }
    }
}
