// # Memory Metadata Store
//
// In-memory implementation of MetadataStore.
//
// ## Purpose
//
// A fast store that doesn't persist across restarts. Useful for tests and
// for one-shot runs where the caller seeds metadata itself.
//
// ## Crash Behavior
//
// - All metadata is lost on exit
// - A record synced again after a restart has no `redirectId` and will be
//   created remotely a second time

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::metadata_store::{MetadataStore, RecordId};

/// In-memory metadata store implementation
///
/// Clones share the same underlying map, so a test can keep a handle while
/// the synchronizer owns another.
///
/// # Example
///
/// ```rust,no_run
/// use helpscout_core::store::MemoryMetadataStore;
/// use helpscout_core::traits::MetadataStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryMetadataStore::new();
///
///     store.set(42, "_helpscout_data", &serde_json::json!({"slug": "install"})).await?;
///
///     let value = store.get(42, "_helpscout_data").await?;
///     assert_eq!(value.unwrap()["slug"], "install");
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadataStore {
    inner: Arc<RwLock<HashMap<RecordId, HashMap<String, serde_json::Value>>>>,
}

impl MemoryMetadataStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of records in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn get(
        &self,
        record_id: RecordId,
        meta_key: &str,
    ) -> Result<Option<serde_json::Value>, Error> {
        let guard = self.inner.read().await;
        Ok(guard
            .get(&record_id)
            .and_then(|meta| meta.get(meta_key))
            .cloned())
    }

    async fn set(
        &self,
        record_id: RecordId,
        meta_key: &str,
        value: &serde_json::Value,
    ) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard
            .entry(record_id)
            .or_default()
            .insert(meta_key.to_string(), value.clone());
        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<RecordId>, Error> {
        let guard = self.inner.read().await;
        let mut ids: Vec<RecordId> = guard.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn flush(&self) -> Result<(), Error> {
        // Nothing buffered
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryMetadataStore::new();

        assert!(store.is_empty().await);
        assert_eq!(store.get(42, "_helpscout_data").await.unwrap(), None);

        store
            .set(42, "_helpscout_data", &json!({"slug": "install", "number": 7}))
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        let value = store.get(42, "_helpscout_data").await.unwrap().unwrap();
        assert_eq!(value["number"], 7);

        // Other keys on the same record are independent
        assert_eq!(store.get(42, "_other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_set_replaces() {
        let store = MemoryMetadataStore::new();

        store.set(1, "k", &json!({"a": 1})).await.unwrap();
        store.set(1, "k", &json!({"b": 2})).await.unwrap();

        assert_eq!(store.get(1, "k").await.unwrap(), Some(json!({"b": 2})));
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemoryMetadataStore::new();
        let handle = store.clone();

        store.set(3, "k", &json!(true)).await.unwrap();
        store.set(1, "k", &json!(true)).await.unwrap();

        assert_eq!(handle.list_records().await.unwrap(), vec![1, 3]);
        handle.flush().await.unwrap();
    }
}
