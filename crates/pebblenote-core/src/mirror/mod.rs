//! Best-effort remote mirroring of note visibility.
//!
//! Local state is authoritative. Mirror writes run as detached tokio tasks:
//! callers never await them, failures are logged and dropped, and nothing is
//! retried. `MirrorDispatcher::drain` exists for short-lived processes that
//! want to give pending writes a bounded chance to land before exiting.

mod http;
mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::codec::note_to_value;
use crate::models::{Note, NoteId};

pub use http::HttpMirror;
pub use memory::MirrorTree;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Invalid mirror configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Mirror HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Mirror API error: {0}")]
    Api(String),
    #[error("Mirror payload error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Mirror unavailable: {0}")]
    Unavailable(String),
}

pub type MirrorResult<T> = Result<T, MirrorError>;

/// Remote tree that mirrors notes keyed by `id.to_string()`
///
/// Writes must be idempotent: the same upsert may arrive more than once and
/// in any order relative to other writes.
#[async_trait]
pub trait RemoteMirror: Send + Sync {
    /// Create or replace the record stored under `key`
    async fn upsert(&self, key: &str, record: Value) -> MirrorResult<()>;

    /// Remove the record stored under `key`, if any
    async fn remove(&self, key: &str) -> MirrorResult<()>;

    /// Fetch every mirrored note, decoded tolerantly
    async fn fetch_all(&self) -> MirrorResult<Vec<Note>>;
}

/// Fire-and-forget front for a `RemoteMirror`
#[derive(Clone)]
pub struct MirrorDispatcher {
    mirror: Arc<dyn RemoteMirror>,
    runtime: Handle,
    in_flight: Arc<watch::Sender<usize>>,
}

impl std::fmt::Debug for MirrorDispatcher {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("MirrorDispatcher")
            .field("in_flight", &self.pending())
            .finish_non_exhaustive()
    }
}

impl MirrorDispatcher {
    /// Dispatch mirror writes onto the given runtime
    pub fn new(mirror: Arc<dyn RemoteMirror>, runtime: Handle) -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            mirror,
            runtime,
            in_flight: Arc::new(in_flight),
        }
    }

    /// Dispatch mirror writes onto the runtime the caller is running in
    pub fn on_current_runtime(mirror: Arc<dyn RemoteMirror>) -> MirrorResult<Self> {
        let runtime = Handle::try_current().map_err(|error| {
            MirrorError::InvalidConfiguration(format!("no tokio runtime available: {error}"))
        })?;
        Ok(Self::new(mirror, runtime))
    }

    /// Queue an upsert of the note's full record. Returns immediately.
    pub fn upsert(&self, note: &Note) {
        let key = note.id.as_key();
        let record = match note_to_value(note) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!("Skipping mirror upsert for note {key}: {error}");
                return;
            }
        };

        let mirror = Arc::clone(&self.mirror);
        let guard = InFlightGuard::enter(&self.in_flight);
        self.runtime.spawn(async move {
            let _guard = guard;
            match mirror.upsert(&key, record).await {
                Ok(()) => tracing::debug!("Mirrored note {key}"),
                Err(error) => tracing::warn!("Mirror upsert failed for note {key}: {error}"),
            }
        });
    }

    /// Queue removal of the note's record. Returns immediately.
    pub fn remove(&self, id: NoteId) {
        let key = id.as_key();
        let mirror = Arc::clone(&self.mirror);
        let guard = InFlightGuard::enter(&self.in_flight);
        self.runtime.spawn(async move {
            let _guard = guard;
            match mirror.remove(&key).await {
                Ok(()) => tracing::debug!("Removed mirrored note {key}"),
                Err(error) => tracing::warn!("Mirror removal failed for note {key}: {error}"),
            }
        });
    }

    /// Pull the remote tree. Unlike writes, this is awaited by the caller.
    pub async fn fetch_all(&self) -> MirrorResult<Vec<Note>> {
        self.mirror.fetch_all().await
    }

    /// Number of mirror writes that have not finished yet
    pub fn pending(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Wait up to `timeout` for pending writes. Returns `true` once idle.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let mut receiver = self.in_flight.subscribe();
        let drained = tokio::time::timeout(timeout, receiver.wait_for(|count| *count == 0))
            .await
            .is_ok_and(|idle| idle.is_ok());
        if !drained {
            tracing::warn!(
                "Gave up waiting on {} pending mirror write(s)",
                self.pending()
            );
        }
        drained
    }
}

struct InFlightGuard {
    counter: Arc<watch::Sender<usize>>,
}

impl InFlightGuard {
    fn enter(counter: &Arc<watch::Sender<usize>>) -> Self {
        counter.send_modify(|count| *count += 1);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteDraft;
    use pretty_assertions::assert_eq;

    fn note(id: u64, title: &str) -> Note {
        Note::from_draft(NoteId::new(id), NoteDraft::new(title, 1.0))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_and_remove_reach_the_tree() {
        let tree = MirrorTree::new();
        let dispatcher = MirrorDispatcher::on_current_runtime(Arc::new(tree.clone())).unwrap();

        dispatcher.upsert(&note(1, "Ghumgham"));
        dispatcher.upsert(&note(2, "fun"));
        assert!(dispatcher.drain(Duration::from_secs(5)).await);
        assert_eq!(tree.keys().await, vec!["1".to_string(), "2".to_string()]);

        dispatcher.remove(NoteId::new(1));
        assert!(dispatcher.drain(Duration::from_secs(5)).await);
        assert_eq!(tree.keys().await, vec!["2".to_string()]);
        assert_eq!(dispatcher.pending(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failures_are_swallowed() {
        let tree = MirrorTree::new();
        tree.set_available(false);
        let dispatcher = MirrorDispatcher::on_current_runtime(Arc::new(tree.clone())).unwrap();

        dispatcher.upsert(&note(1, "photo"));
        dispatcher.remove(NoteId::new(1));
        assert!(dispatcher.drain(Duration::from_secs(5)).await);
        assert!(tree.keys().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_all_decodes_tree() {
        let tree = MirrorTree::new();
        let dispatcher = MirrorDispatcher::on_current_runtime(Arc::new(tree.clone())).unwrap();
        dispatcher.upsert(&note(3, "photo"));
        assert!(dispatcher.drain(Duration::from_secs(5)).await);

        let notes = dispatcher.fetch_all().await.unwrap();
        assert_eq!(notes, vec![note(3, "photo")]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn drain_times_out_while_writes_are_stuck() {
        let tree = MirrorTree::new();
        tree.set_latency(Duration::from_secs(60));
        let dispatcher = MirrorDispatcher::on_current_runtime(Arc::new(tree)).unwrap();

        dispatcher.upsert(&note(1, "slow"));
        assert_eq!(dispatcher.pending(), 1);
        assert!(!dispatcher.drain(Duration::from_millis(20)).await);
    }

    #[test]
    fn on_current_runtime_requires_runtime() {
        assert!(MirrorDispatcher::on_current_runtime(Arc::new(MirrorTree::new())).is_err());
    }
}
