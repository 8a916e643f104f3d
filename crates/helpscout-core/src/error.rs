//! Error types for the Help Scout redirect sync
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

use crate::traits::RecordId;

/// Result type alias for sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned when a record lacks the data needed to build a redirect
pub const MISSING_SLUG_MESSAGE: &str = "something went wrong.";

/// Message returned when the remote service rejects or never answers a request
pub const REQUEST_FAILED_MESSAGE: &str = "Request was not successful.";

/// Core error type for the redirect sync
#[derive(Error, Debug)]
pub enum Error {
    /// The record's metadata has no `slug` or no `number`
    #[error("something went wrong.")]
    MissingSlugData {
        /// Record that could not be synchronized
        record_id: RecordId,
    },

    /// The Docs API call failed at the transport level or returned a non-200 status
    #[error("Request was not successful.")]
    RequestFailed {
        /// HTTP status, if a response was received at all
        status: Option<u16>,
        /// Underlying cause, for logs
        reason: String,
    },

    /// Metadata store errors
    #[error("Metadata store error: {0}")]
    MetadataStore(String),

    /// Permalink resolution errors
    #[error("Permalink error: {0}")]
    Permalink(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors (connection, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a missing-slug error
    pub fn missing_slug(record_id: RecordId) -> Self {
        Self::MissingSlugData { record_id }
    }

    /// Create a request-failed error
    pub fn request_failed(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            reason: reason.into(),
        }
    }

    /// Create a metadata store error
    pub fn metadata_store(msg: impl Into<String>) -> Self {
        Self::MetadataStore(msg.into())
    }

    /// Create a permalink error
    pub fn permalink(msg: impl Into<String>) -> Self {
        Self::Permalink(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether this failure happened before any network call was made
    pub fn is_missing_slug(&self) -> bool {
        matches!(self, Self::MissingSlugData { .. })
    }

    /// Whether this failure came from the remote request
    pub fn is_request_failed(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }

    /// Render the error as the `{"error": "..."}` object callers of the
    /// plugin-era API inspect.
    pub fn failure_body(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
