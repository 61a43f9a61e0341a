//! Bookkeeping of every match started by this process.

use std::collections::HashMap;
use std::sync::Arc;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a match.
pub type MatchId = String;

/// What the registry remembers about a match.
#[derive(Debug, Clone, Getters, new)]
pub struct MatchHandle {
    id: MatchId,
    player1: String,
    player2: String,
    #[getter(skip)]
    task: AbortHandle,
}

impl MatchHandle {
    /// Cancels the match task. Its connections are dropped with it and
    /// nothing is recorded.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn abort(&self) {
        info!("Aborting match task");
        self.task.abort();
    }

    /// Whether the match task has ended, normally or by abort.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Registration rejected because the id is already present.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Match {} is already registered", id)]
pub struct DuplicateMatch {
    /// The colliding id.
    pub id: MatchId,
}

/// Process-wide map from match id to handle.
///
/// Entries are added once and never removed.
#[derive(Debug, Clone, Default)]
pub struct MatchRegistry {
    matches: Arc<Mutex<HashMap<MatchId, MatchHandle>>>,
}

impl MatchRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating match registry");
        Self::default()
    }

    /// Records a newly paired match.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateMatch`] if the id is already present; the existing
    /// entry is left untouched.
    #[instrument(skip(self, handle), fields(match_id = %handle.id()))]
    pub async fn register(&self, handle: MatchHandle) -> Result<(), DuplicateMatch> {
        let mut matches = self.matches.lock().await;

        if matches.contains_key(handle.id()) {
            warn!("Match id already registered");
            return Err(DuplicateMatch {
                id: handle.id().clone(),
            });
        }

        matches.insert(handle.id().clone(), handle);
        info!(count = matches.len(), "Match registered");
        Ok(())
    }

    /// Looks up a match by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Option<MatchHandle> {
        let handle = self.matches.lock().await.get(id).cloned();
        if handle.is_none() {
            debug!(match_id = id, "Match not found");
        }
        handle
    }

    /// Cancels the match `id`. Returns `false` if the id is unknown.
    #[instrument(skip(self))]
    pub async fn abort(&self, id: &str) -> bool {
        match self.matches.lock().await.get(id) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => {
                debug!(match_id = id, "Match not found");
                false
            }
        }
    }

    /// Number of registered matches.
    #[instrument(skip(self))]
    pub async fn len(&self) -> usize {
        self.matches.lock().await.len()
    }

    /// Whether nothing has been registered yet.
    #[instrument(skip(self))]
    pub async fn is_empty(&self) -> bool {
        self.matches.lock().await.is_empty()
    }

    /// All registered ids, in no particular order.
    #[instrument(skip(self))]
    pub async fn ids(&self) -> Vec<MatchId> {
        self.matches.lock().await.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::pending;

    fn handle(id: &str, player1: &str, player2: &str) -> MatchHandle {
        let task = tokio::spawn(pending::<()>());
        MatchHandle::new(
            id.to_string(),
            player1.to_string(),
            player2.to_string(),
            task.abort_handle(),
        )
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let registry = MatchRegistry::new();
        registry.register(handle("m1", "ann", "bob")).await.unwrap();

        let found = registry.get("m1").await.expect("Registered");
        assert_eq!(found.id(), "m1");
        assert_eq!(found.player1(), "ann");
        assert_eq!(found.player2(), "bob");
        assert!(registry.get("m2").await.is_none());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let registry = MatchRegistry::new();
        registry.register(handle("m1", "ann", "bob")).await.unwrap();

        let err = registry
            .register(handle("m1", "cat", "dan"))
            .await
            .unwrap_err();
        assert_eq!(err.id, "m1");
        let kept = registry.get("m1").await.expect("Registered");
        assert_eq!(kept.player1(), "ann");
    }

    #[tokio::test]
    async fn test_abort_cancels_stalled_task() {
        let registry = MatchRegistry::new();
        let task = tokio::spawn(pending::<()>());
        let entry = MatchHandle::new(
            "m1".to_string(),
            "ann".to_string(),
            "bob".to_string(),
            task.abort_handle(),
        );
        registry.register(entry).await.unwrap();

        assert!(registry.abort("m1").await);
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(registry.get("m1").await.unwrap().is_finished());
        assert!(!registry.abort("missing").await);
    }

    #[tokio::test]
    async fn test_concurrent_registration() {
        let registry = MatchRegistry::new();
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    let entry = handle(&format!("m{i}"), "a", "b");
                    registry.register(entry).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut ids = registry.ids().await;
        ids.sort();
        assert_eq!(ids.len(), 16);
        assert!(!registry.is_empty().await);
    }
}
