//! Pure tic-tac-toe game logic.
//!
//! The board knows nothing about connections or turns; it stores marks,
//! validates coordinates, and evaluates whether a line has been completed.
//!
//! # Example
//!
//! ```
//! use strictly_tictactoe::{Board, Mark, Outcome};
//!
//! let mut board = Board::new();
//! for col in 0..3 {
//!     let cell = board.validate_move(0, col).expect("free cell");
//!     board.apply_move(cell, Mark::X);
//! }
//! assert_eq!(board.evaluate_outcome(), Some(Outcome::Win(Mark::X)));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
pub mod rules;
mod types;

pub use board::Board;
pub use error::InvalidMove;
pub use types::{Cell, Mark, Outcome, Square};

/// Side length of the board.
pub const BOARD_SIZE: usize = 3;
