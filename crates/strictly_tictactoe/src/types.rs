//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

use crate::BOARD_SIZE;

/// Mark placed by a participant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
pub enum Mark {
    /// Mark of the first-seated participant (moves first).
    X,
    /// Mark of the second-seated participant.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the board.
///
/// Serialized as `""` when empty and as the mark letter otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        match square {
            Square::Empty => String::new(),
            Square::Occupied(mark) => mark.to_string(),
        }
    }
}

impl TryFrom<String> for Square {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Ok(Square::Empty)
        } else {
            value.parse::<Mark>().map(Square::Occupied)
        }
    }
}

/// Terminal result of a match.
///
/// Serialized as `"X"`, `"O"`, or `"Draw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(into = "String", try_from = "String")]
pub enum Outcome {
    /// Three in a row for the given mark.
    #[display("{_0}")]
    Win(Mark),
    /// Full board, no winner.
    #[display("Draw")]
    Draw,
}

impl Outcome {
    /// Returns the winning mark, or `None` for a draw.
    pub fn winner(self) -> Option<Mark> {
        match self {
            Outcome::Win(mark) => Some(mark),
            Outcome::Draw => None,
        }
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.to_string()
    }
}

impl TryFrom<String> for Outcome {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "Draw" {
            Ok(Outcome::Draw)
        } else {
            value.parse::<Mark>().map(Outcome::Win)
        }
    }
}

/// A coordinate known to lie inside the board (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    row: usize,
    col: usize,
}

impl Cell {
    /// Creates a cell if both indices fall inside the grid.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < BOARD_SIZE && col < BOARD_SIZE).then_some(Self { row, col })
    }

    /// Zero-based row.
    pub fn row(self) -> usize {
        self.row
    }

    /// Zero-based column.
    pub fn col(self) -> usize {
        self.col
    }

    /// Row-major index (0-8).
    pub fn index(self) -> usize {
        self.row * BOARD_SIZE + self.col
    }

    /// All nine cells in row-major order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Cell { row, col }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent_flips() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }

    #[test]
    fn test_square_strings() {
        assert_eq!(String::from(Square::Empty), "");
        assert_eq!(String::from(Square::Occupied(Mark::O)), "O");
        assert_eq!(Square::try_from(String::new()), Ok(Square::Empty));
        assert_eq!(
            Square::try_from("X".to_string()),
            Ok(Square::Occupied(Mark::X))
        );
        assert!(Square::try_from("Z".to_string()).is_err());
    }

    #[test]
    fn test_outcome_strings() {
        assert_eq!(Outcome::Win(Mark::X).to_string(), "X");
        assert_eq!(Outcome::Draw.to_string(), "Draw");
        assert_eq!(Outcome::try_from("Draw".to_string()), Ok(Outcome::Draw));
        assert_eq!(
            Outcome::try_from("O".to_string()),
            Ok(Outcome::Win(Mark::O))
        );
    }

    #[test]
    fn test_cell_bounds() {
        assert!(Cell::new(2, 2).is_some());
        assert!(Cell::new(3, 0).is_none());
        assert!(Cell::new(0, 3).is_none());
        assert_eq!(Cell::all().count(), 9);
        assert_eq!(Cell::new(1, 2).map(Cell::index), Some(5));
    }
}
