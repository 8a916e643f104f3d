// # Metadata Store Trait
//
// Defines the interface to the CMS's per-record metadata.
//
// ## Purpose
//
// Each content record carries a metadata mapping under a fixed key
// (`_helpscout_data`). The synchronizer reads it to find the article's
// slug/number and caches the remote `redirectId` there after a successful
// create, which is what makes repeated syncs route through update.
//
// ## Implementations
//
// - In-memory: `MemoryMetadataStore` (tests, one-shot runs)
// - File-based: `FileMetadataStore` (JSON file with atomic writes)
//
// ## Usage
//
// ```rust,ignore
// use helpscout_core::MetadataStore;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* MetadataStore implementation */;
//
//     let data = store.get(42, "_helpscout_data").await?;
//     store.set(42, "_helpscout_data", &serde_json::json!({"slug": "install"})).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Identifier of a content record in the CMS
pub type RecordId = u64;

/// Trait for metadata store implementations
///
/// Values are arbitrary JSON so the store stays ignorant of what the
/// synchronizer keeps in them.
///
/// # Thread Safety
///
/// All methods must be safe to call from multiple tasks. Nothing here
/// guards a read-modify-write sequence; two syncs of the same record racing
/// each other can lose an update.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Read one metadata value
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: The stored value
    /// - `Ok(None)`: Record or key not present
    /// - `Err(Error)`: Storage error
    async fn get(
        &self,
        record_id: RecordId,
        meta_key: &str,
    ) -> Result<Option<serde_json::Value>, crate::Error>;

    /// Create or replace one metadata value
    async fn set(
        &self,
        record_id: RecordId,
        meta_key: &str,
        value: &serde_json::Value,
    ) -> Result<(), crate::Error>;

    /// List all record IDs that have any metadata
    async fn list_records(&self) -> Result<Vec<RecordId>, crate::Error>;

    /// Persist any pending changes
    ///
    /// Some implementations may buffer writes. This ensures all changes
    /// reach persistent storage.
    async fn flush(&self) -> Result<(), crate::Error>;
}
