//! The 3x3 board.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::rules::{check_winner, is_full};
use crate::{BOARD_SIZE, Cell, InvalidMove, Mark, Outcome, Square};

/// 3x3 tic-tac-toe board.
///
/// Serialized as a row-major 3x3 array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "[[Square; 3]; 3]", from = "[[Square; 3]; 3]")]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given cell.
    pub fn get(&self, cell: Cell) -> Square {
        self.squares[cell.index()]
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Checks a 0-based coordinate against the grid.
    ///
    /// # Errors
    ///
    /// [`InvalidMove::OutOfRange`] when either index is outside `[0, 3)`,
    /// [`InvalidMove::CellOccupied`] when the square already holds a mark.
    #[instrument(skip(self))]
    pub fn validate_move(&self, row: i64, col: i64) -> Result<Cell, InvalidMove> {
        let cell = usize::try_from(row)
            .ok()
            .zip(usize::try_from(col).ok())
            .and_then(|(r, c)| Cell::new(r, c))
            .ok_or(InvalidMove::OutOfRange { row, col })?;

        if self.get(cell) != Square::Empty {
            return Err(InvalidMove::CellOccupied {
                row: cell.row(),
                col: cell.col(),
            });
        }

        Ok(cell)
    }

    /// Places `mark` at `cell`.
    ///
    /// The cell must come from [`Board::validate_move`] in the same turn;
    /// occupancy is not re-checked.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, cell: Cell, mark: Mark) {
        self.squares[cell.index()] = Square::Occupied(mark);
    }

    /// Evaluates the board after a move.
    ///
    /// Returns the winning mark if any row, column, or diagonal is complete,
    /// [`Outcome::Draw`] if the board is full without one, `None` otherwise.
    #[instrument(skip(self))]
    pub fn evaluate_outcome(&self) -> Option<Outcome> {
        if let Some(winner) = check_winner(self) {
            Some(Outcome::Win(winner))
        } else if is_full(self) {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    /// Formats the board as sent over the wire.
    ///
    /// Rows and columns are numbered from 1; empty squares show as `_`.
    pub fn render(&self) -> String {
        let mut out = String::from("\n    1 2 3\n  --------\n");
        for row in 0..BOARD_SIZE {
            out.push_str(&format!("{} | ", row + 1));
            for col in 0..BOARD_SIZE {
                let square = self.squares[row * BOARD_SIZE + col];
                match square.mark() {
                    Some(mark) => out.push_str(&mark.to_string()),
                    None => out.push('_'),
                }
                out.push(' ');
            }
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

impl From<Board> for [[Square; 3]; 3] {
    fn from(board: Board) -> Self {
        let mut rows = [[Square::Empty; 3]; 3];
        for cell in Cell::all() {
            rows[cell.row()][cell.col()] = board.get(cell);
        }
        rows
    }
}

impl From<[[Square; 3]; 3]> for Board {
    fn from(rows: [[Square; 3]; 3]) -> Self {
        let mut board = Board::new();
        for cell in Cell::all() {
            board.squares[cell.index()] = rows[cell.row()][cell.col()];
        }
        board
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
