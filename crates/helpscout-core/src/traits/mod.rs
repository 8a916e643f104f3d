//! Core traits for the redirect sync
//!
//! This module defines the collaborator interfaces the synchronizer is built on.
//!
//! - [`MetadataStore`]: Per-record metadata owned by the CMS
//! - [`PermalinkResolver`]: Public URL of a record
//! - [`DocsTransport`]: HTTP calls to the Help Scout Docs API

pub mod docs_transport;
pub mod metadata_store;
pub mod permalink;

pub use docs_transport::{ApiResponse, DocsTransport};
pub use metadata_store::{MetadataStore, RecordId};
pub use permalink::PermalinkResolver;
