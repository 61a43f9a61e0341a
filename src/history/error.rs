//! Result history error types.

use derive_more::{Display, Error, From};
use tracing::instrument;

/// What went wrong while persisting or loading the history file.
#[derive(Debug, Display, Error, From)]
pub enum HistoryErrorKind {
    /// Reading or writing the file failed.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),
    /// The snapshot could not be encoded or decoded.
    #[display("JSON error: {_0}")]
    Json(serde_json::Error),
}

/// Persistence error with location tracking.
#[derive(Debug, Display, Error)]
#[display("History error: {} at {}:{}", kind, file, line)]
pub struct HistoryError {
    /// Underlying failure.
    #[error(source)]
    pub kind: HistoryErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl HistoryError {
    /// Wraps `kind` with the caller's location.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: impl Into<HistoryErrorKind>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind: kind.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for HistoryError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(err)
    }
}

impl From<serde_json::Error> for HistoryError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_error_kept_as_source() {
        let err = HistoryError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no history",
        ));

        assert!(matches!(
            err.kind,
            HistoryErrorKind::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound
        ));
        assert!(err.file.ends_with("error.rs"));
        let source = err.source().expect("Source kept");
        assert_eq!(source.to_string(), "I/O error: no history");
    }

    #[test]
    fn test_json_error_kept_as_source() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = HistoryError::from(json_err);

        assert!(matches!(err.kind, HistoryErrorKind::Json(_)));
        assert!(err.to_string().starts_with("History error: JSON error:"));
    }
}
