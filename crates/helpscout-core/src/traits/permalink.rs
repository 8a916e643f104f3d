// # Permalink Resolver Trait
//
// The CMS owns permalinks; this is the seam through which the synchronizer
// asks for the public URL a Help Scout redirect should point at.

use async_trait::async_trait;

use super::metadata_store::RecordId;

/// Trait for permalink resolvers
#[async_trait]
pub trait PermalinkResolver: Send + Sync {
    /// Get the canonical public URL of a record
    async fn permalink(&self, record_id: RecordId) -> Result<String, crate::Error>;
}
