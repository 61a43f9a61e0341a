//! Line-oriented wire protocol.
//!
//! Every server message is plain text. Most end in a newline; the board
//! carries its own blank lines. Clients answer with single lines.

use derive_more::{Display, Error};
use strictly_tictactoe::{Board, Outcome};
use tracing::instrument;

/// Substring that tells a client relay the match is over.
pub const GAME_OVER_MARKER: &str = "Game over!";

/// Character that ends the username prompt.
pub const PROMPT_DELIMITER: u8 = b':';

/// Message sent from the server to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ServerMessage {
    /// Sent once on connect; the client reads up to the colon.
    #[display("Enter your username: \n")]
    UsernamePrompt,
    /// Rendered board, sent to both participants each turn.
    #[display("{_0}")]
    Board(Board),
    /// Sent to the active participant only.
    #[display("Your turn! Enter row and column (e.g., 2 3):\n")]
    TurnPrompt,
    /// Rejection of the active participant's last line.
    #[display("Invalid move: {_0}\n")]
    InvalidMove(String),
    /// A participant dropped while a move was expected.
    #[display("Player disconnected! game over!\n")]
    Disconnected,
    /// Terminal outcome.
    #[display("{}", finish_text(_0))]
    Finished(Outcome),
}

fn finish_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Draw => format!("{GAME_OVER_MARKER} It's a draw!\n"),
        Outcome::Win(mark) => format!("{GAME_OVER_MARKER} Player {mark} wins!\n"),
    }
}

/// A move as typed by a participant, converted to 0-based indices.
///
/// Indices are not range-checked here; see `Board::validate_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveInput {
    row: i64,
    col: i64,
}

impl MoveInput {
    /// Zero-based row.
    pub fn row(self) -> i64 {
        self.row
    }

    /// Zero-based column.
    pub fn col(self) -> i64 {
        self.col
    }
}

/// Malformed move text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ParseMoveError {
    /// The line did not split into exactly two parts on a single space.
    #[display("expected two numbers separated by space")]
    WrongShape,
    /// One of the parts is not a decimal integer.
    #[display("invalid numbers")]
    NotNumeric,
}

/// Parses `"<row> <col>"` (1-based) into 0-based indices.
///
/// # Errors
///
/// [`ParseMoveError::WrongShape`] unless the line splits into exactly two
/// parts on a single space; [`ParseMoveError::NotNumeric`] if either part
/// is not an integer.
#[instrument]
pub fn parse_move(line: &str) -> Result<MoveInput, ParseMoveError> {
    let parts: Vec<&str> = line.split(' ').collect();
    let [row, col] = parts.as_slice() else {
        return Err(ParseMoveError::WrongShape);
    };

    match (row.parse::<i64>(), col.parse::<i64>()) {
        (Ok(row), Ok(col)) => Ok(MoveInput {
            row: row.saturating_sub(1),
            col: col.saturating_sub(1),
        }),
        _ => Err(ParseMoveError::NotNumeric),
    }
}
