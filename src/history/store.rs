//! JSON snapshot file for the result log.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::history::{HistoryError, ResultSummary};

/// File holding the full ordered list of summaries.
///
/// Every write replaces the whole file.
#[derive(Debug, Clone)]
pub struct JsonResultStore {
    path: PathBuf,
}

impl JsonResultStore {
    /// Creates a store writing to `path`. Nothing is touched until the first write.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        debug!("Creating JsonResultStore");
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the file with `entries`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if serialization or the write fails.
    #[instrument(skip(self, entries), fields(path = %self.path.display(), count = entries.len()))]
    pub async fn write_all(&self, entries: &[ResultSummary]) -> Result<(), HistoryError> {
        let mut bytes = serde_json::to_vec(entries)?;
        bytes.push(b'\n');
        tokio::fs::write(&self.path, bytes).await?;
        debug!("History snapshot written");
        Ok(())
    }

    /// Reads the last snapshot back.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the file is missing or malformed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Vec<ResultSummary>, HistoryError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let entries: Vec<ResultSummary> = serde_json::from_slice(&bytes)?;
        info!(count = entries.len(), "History snapshot loaded");
        Ok(entries)
    }
}
