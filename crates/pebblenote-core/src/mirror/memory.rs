//! In-process mirror tree

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::{MirrorError, MirrorResult, RemoteMirror};
use crate::codec::decode_remote_tree;
use crate::models::Note;

/// `RemoteMirror` held in memory. Clones share the same tree.
#[derive(Clone, Debug)]
pub struct MirrorTree {
    children: Arc<Mutex<BTreeMap<String, Value>>>,
    available: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
}

impl Default for MirrorTree {
    fn default() -> Self {
        Self {
            children: Arc::default(),
            available: Arc::new(AtomicBool::new(true)),
            latency_ms: Arc::default(),
        }
    }
}

impl MirrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while unavailable every call fails.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Delay applied before every call.
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// Keys currently present, in key order
    pub async fn keys(&self) -> Vec<String> {
        self.children.lock().await.keys().cloned().collect()
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.children.lock().await.get(key).cloned()
    }

    /// Write a raw child, bypassing the mirror contract (e.g. edits made by
    /// another client).
    pub async fn insert_raw(&self, key: impl Into<String>, value: Value) {
        self.children.lock().await.insert(key.into(), value);
    }

    async fn enter(&self) -> MirrorResult<()> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(MirrorError::Unavailable("mirror tree is offline".into()))
        }
    }
}

#[async_trait]
impl RemoteMirror for MirrorTree {
    async fn upsert(&self, key: &str, record: Value) -> MirrorResult<()> {
        self.enter().await?;
        self.children.lock().await.insert(key.to_string(), record);
        Ok(())
    }

    async fn remove(&self, key: &str) -> MirrorResult<()> {
        self.enter().await?;
        self.children.lock().await.remove(key);
        Ok(())
    }

    async fn fetch_all(&self) -> MirrorResult<Vec<Note>> {
        self.enter().await?;
        let snapshot = self
            .children
            .lock()
            .await
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<Map<String, Value>>();
        Ok(decode_remote_tree(&Value::Object(snapshot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let tree = MirrorTree::new();
        tree.upsert("1", json!({"id": 1, "title": "A"})).await.unwrap();
        tree.upsert("1", json!({"id": 1, "title": "A"})).await.unwrap();
        assert_eq!(tree.keys().await, vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let tree = MirrorTree::new();
        assert!(tree.remove("404").await.is_ok());
    }

    #[tokio::test]
    async fn test_offline_tree_rejects_calls() {
        let tree = MirrorTree::new();
        tree.set_available(false);
        assert!(matches!(
            tree.fetch_all().await,
            Err(MirrorError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_all_uses_keys_for_missing_ids() {
        let tree = MirrorTree::new();
        tree.insert_raw("12", json!({"title": "from another client"}))
            .await;
        let notes = tree.fetch_all().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id.get(), 12);
        assert_eq!(notes[0].title, "from another client");
    }
}
