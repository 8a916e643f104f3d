// # File Metadata Store
//
// File-based implementation of MetadataStore with crash recovery.
//
// ## Purpose
//
// Keeps record metadata (and with it each record's `redirectId`) across
// runs, so a record that was already created on Help Scout is updated
// instead of created again.
//
// ## Crash Recovery
//
// - Atomic writes: write-then-rename
// - Automatic backup: keeps `.backup` of the previous file
// - Recovery: falls back to the backup if the main file fails to parse
//
// ## File Format
//
// Records may be written by hand to seed article data; `last_updated` is
// optional and filled in on the next write.
//
// ```json
// {
//   "version": "1.0",
//   "records": {
//     "42": {
//       "meta": {
//         "_helpscout_data": { "slug": "install", "number": 7, "redirectId": "xyz" }
//       },
//       "last_updated": "2025-01-09T12:00:00Z"
//     }
//   }
// }
// ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::metadata_store::{MetadataStore, RecordId};

/// Metadata file format version
const METADATA_FILE_VERSION: &str = "1.0";

/// Stored metadata for one record
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StoredRecord {
    #[serde(default)]
    meta: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

/// Serializable file format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct MetadataFileFormat {
    version: String,
    records: HashMap<RecordId, StoredRecord>,
}

/// Internal state for the file-based store
#[derive(Debug)]
struct FileState {
    records: HashMap<RecordId, StoredRecord>,
    dirty: bool,
}

/// File-based metadata store with crash recovery
///
/// Every `set` is written through to disk before it returns.
///
/// # Example
///
/// ```rust,no_run
/// use helpscout_core::store::FileMetadataStore;
/// use helpscout_core::traits::MetadataStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileMetadataStore::new("/var/lib/helpscout/meta.json").await?;
///
///     store.set(42, "_helpscout_data", &serde_json::json!({"slug": "install"})).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileMetadataStore {
    path: PathBuf,
    state: Arc<RwLock<FileState>>,
}

impl FileMetadataStore {
    /// Create or load a file metadata store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Load the existing file, if any
    /// 3. If it is corrupted, load the backup instead
    /// 4. If both fail to parse, start empty
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create metadata directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let records = Self::load_with_recovery(&path).await?;

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(FileState {
                records,
                dirty: false,
            })),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load records, falling back to the backup on a parse failure
    async fn load_with_recovery(path: &Path) -> Result<HashMap<RecordId, StoredRecord>, Error> {
        let Some(content) = Self::read_file(path).await? else {
            tracing::debug!("Metadata file does not exist: {}", path.display());
            return Ok(HashMap::new());
        };

        let parse_err = match Self::parse(&content) {
            Ok(records) => {
                tracing::debug!("Loaded metadata for {} record(s)", records.len());
                return Ok(records);
            }
            Err(e) => e,
        };

        tracing::warn!(
            "Metadata file {} appears corrupted: {}. Attempting recovery from backup.",
            path.display(),
            parse_err
        );

        let backup_path = Self::backup_path(path);
        let Some(backup) = Self::read_file(&backup_path).await? else {
            tracing::warn!("No backup file found. Starting with empty metadata.");
            return Ok(HashMap::new());
        };

        match Self::parse(&backup) {
            Ok(records) => {
                tracing::info!("Recovered metadata from backup: {} record(s)", records.len());
                if let Err(e) = fs::copy(&backup_path, path).await {
                    tracing::error!("Failed to restore metadata file from backup: {}", e);
                }
                Ok(records)
            }
            Err(e) => {
                tracing::error!("Backup also corrupted: {}. Starting with empty metadata.", e);
                Ok(HashMap::new())
            }
        }
    }

    async fn read_file(path: &Path) -> Result<Option<String>, Error> {
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(path).await.map(Some).map_err(|e| {
            Error::metadata_store(format!(
                "Failed to read metadata file {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn parse(content: &str) -> Result<HashMap<RecordId, StoredRecord>, serde_json::Error> {
        let file: MetadataFileFormat = serde_json::from_str(content)?;
        if file.version != METADATA_FILE_VERSION {
            tracing::warn!(
                "Metadata file version mismatch: expected {}, got {}. Attempting to load anyway.",
                METADATA_FILE_VERSION,
                file.version
            );
        }
        Ok(file.records)
    }

    /// Write state to file atomically
    async fn write_state(&self) -> Result<(), Error> {
        let mut state_guard = self.state.write().await;

        let file = MetadataFileFormat {
            version: METADATA_FILE_VERSION.to_string(),
            records: state_guard.records.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::metadata_store(format!("Failed to serialize metadata: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut temp = fs::File::create(&temp_path).await.map_err(|e| {
                Error::metadata_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            temp.write_all(json.as_bytes()).await.map_err(|e| {
                Error::metadata_store(format!(
                    "Failed to write temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            temp.flush().await.map_err(|e| {
                Error::metadata_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        if self.path.exists()
            && let Err(e) = fs::copy(&self.path, Self::backup_path(&self.path)).await
        {
            tracing::warn!("Failed to create backup: {}", e);
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::metadata_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        state_guard.dirty = false;
        tracing::trace!("Metadata written to file: {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl MetadataStore for FileMetadataStore {
    async fn get(
        &self,
        record_id: RecordId,
        meta_key: &str,
    ) -> Result<Option<serde_json::Value>, Error> {
        let state_guard = self.state.read().await;
        Ok(state_guard
            .records
            .get(&record_id)
            .and_then(|r| r.meta.get(meta_key))
            .cloned())
    }

    async fn set(
        &self,
        record_id: RecordId,
        meta_key: &str,
        value: &serde_json::Value,
    ) -> Result<(), Error> {
        {
            let mut state_guard = self.state.write().await;
            let record = state_guard
                .records
                .entry(record_id)
                .or_insert_with(|| StoredRecord {
                    meta: HashMap::new(),
                    last_updated: None,
                });
            record.meta.insert(meta_key.to_string(), value.clone());
            record.last_updated = Some(chrono::Utc::now());
            state_guard.dirty = true;
        }

        // Immediate write for durability
        self.write_state().await
    }

    async fn list_records(&self) -> Result<Vec<RecordId>, Error> {
        let state_guard = self.state.read().await;
        let mut ids: Vec<RecordId> = state_guard.records.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn flush(&self) -> Result<(), Error> {
        let dirty = self.state.read().await.dirty;
        if dirty { self.write_state().await } else { Ok(()) }
    }
}
