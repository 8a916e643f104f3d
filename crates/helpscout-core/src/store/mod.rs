// # Metadata Store Implementations
//
// This module provides implementations of the MetadataStore trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::FileMetadataStore;
pub use memory::MemoryMetadataStore;

use crate::config::MetadataStoreConfig;
use crate::traits::MetadataStore;

/// Build a metadata store from configuration
pub async fn from_config(config: &MetadataStoreConfig) -> crate::Result<Box<dyn MetadataStore>> {
    config.validate()?;
    match config {
        MetadataStoreConfig::File { path } => Ok(Box::new(FileMetadataStore::new(path).await?)),
        MetadataStoreConfig::Memory => Ok(Box::new(MemoryMetadataStore::new())),
    }
}
