//! Append-only record of finished matches, persisted as JSON.

mod error;
mod log;
mod models;
mod store;

pub use error::{HistoryError, HistoryErrorKind};
pub use log::ResultLog;
pub use models::ResultSummary;
pub use store::JsonResultStore;
