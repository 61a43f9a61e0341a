//! Move validation errors.

use derive_more::{Display, Error};

/// Reason a requested move was rejected.
///
/// Indices are the 0-based values that were checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum InvalidMove {
    /// Row or column falls outside the 3x3 grid.
    #[display("row and column must be between 1 and 3")]
    OutOfRange {
        /// Requested row.
        row: i64,
        /// Requested column.
        col: i64,
    },
    /// Target square already holds a mark.
    #[display("cell already occupied")]
    CellOccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
}
