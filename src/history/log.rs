//! Process-wide result log shared by all matches.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::history::{JsonResultStore, ResultSummary};

/// Ordered, append-only list of finished matches.
///
/// Cloning yields another handle to the same log. The lock is held across
/// the file write, so concurrent appends persist in the order they land.
#[derive(Debug, Clone)]
pub struct ResultLog {
    entries: Arc<Mutex<Vec<ResultSummary>>>,
    store: JsonResultStore,
}

impl ResultLog {
    /// Creates an empty log persisting to `store`.
    #[instrument(skip(store), fields(path = %store.path().display()))]
    pub fn new(store: JsonResultStore) -> Self {
        info!("Creating result log");
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            store,
        }
    }

    /// Appends `summary` and rewrites the snapshot.
    ///
    /// A failed write is logged; the in-memory entry is kept.
    #[instrument(skip(self, summary), fields(game_id = %summary.game_id(), winner = %summary.winner()))]
    pub async fn append(&self, summary: ResultSummary) {
        let mut entries = self.entries.lock().await;
        entries.push(summary);

        match self.store.write_all(&entries).await {
            Ok(()) => info!(count = entries.len(), "Result recorded"),
            Err(e) => error!(error = %e, count = entries.len(), "Failed to persist result log"),
        }
    }

    /// Copy of the current entries, oldest first.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Vec<ResultSummary> {
        self.entries.lock().await.clone()
    }

    /// Number of recorded matches.
    #[instrument(skip(self))]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no match has been recorded yet.
    #[instrument(skip(self))]
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Snapshot destination.
    pub fn store(&self) -> &JsonResultStore {
        &self.store
    }
}
