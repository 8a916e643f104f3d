// # helpscout-core
//
// Core library for keeping Help Scout Docs redirects in step with CMS
// content records.
//
// ## Architecture Overview
//
// - **MetadataStore**: Trait for per-record metadata (`_helpscout_data`)
// - **PermalinkResolver**: Trait for a record's public URL
// - **DocsTransport**: Trait for HTTP calls to the Help Scout Docs API
// - **RedirectSynchronizer**: Create-or-update flow tying the three together
//
// ## Design Principles
//
// 1. **Injected collaborators**: No global state; everything arrives at construction
// 2. **Library-First**: The binary is a thin wrapper
// 3. **Idempotency**: The stored `redirectId` makes repeated syncs update, not duplicate

pub mod config;
pub mod error;
pub mod permalink;
pub mod redirect;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{DocsApiConfig, HelpscoutConfig, MetadataStoreConfig, PermalinkConfig};
pub use error::{Error, Result};
pub use permalink::TemplatePermalinkResolver;
pub use redirect::{
    HELPSCOUT_META_KEY, HelpscoutData, RedirectBody, RedirectSynchronizer, SyncAction,
    SyncOutcome,
};
pub use store::{FileMetadataStore, MemoryMetadataStore};
pub use traits::{ApiResponse, DocsTransport, MetadataStore, PermalinkResolver, RecordId};
