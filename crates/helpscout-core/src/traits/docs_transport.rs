// # Docs Transport Trait
//
// Defines the interface for sending redirect requests to the Help Scout
// Docs API.
//
// ## Implementations
//
// - reqwest-based: `helpscout-docs-api` crate
// - Tests: call-recording mocks in `tests/common`
//
// ## Usage
//
// ```rust,ignore
// use helpscout_core::DocsTransport;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let transport = /* DocsTransport implementation */;
//
//     let body = r#"{"siteId":"S1","urlMapping":"/article/7-install","redirect":"https://example.com/"}"#;
//     let response = transport.post("redirects", body).await?;
//     println!("status: {}", response.status);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Raw response from the Docs API
///
/// Non-2xx statuses are carried here, not turned into errors. Deciding what
/// counts as success is the synchronizer's job.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers in the order received
    pub headers: Vec<(String, String)>,
    /// Response body as text (often empty for redirects)
    pub body: String,
}

impl ApiResponse {
    /// Create a response with no headers and an empty body
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Get the first header value matching `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Trait for Docs API transports
///
/// # Trust Level: Untrusted
///
/// Transports are single-shot: one HTTP request per call, no retries, no
/// caching, no access to the metadata store. A returned `Err` means no
/// usable response was received (connection refused, timeout, unreadable
/// body).
///
/// Paths are relative to the API root, e.g. `redirects` or
/// `redirects/5f1b...`. Bodies are already-serialized JSON and must be sent
/// byte-for-byte.
#[async_trait]
pub trait DocsTransport: Send + Sync {
    /// Send a `POST` with a JSON body
    async fn post(&self, path: &str, body: &str) -> Result<ApiResponse, crate::Error>;

    /// Send a `PUT` with a JSON body
    async fn put(&self, path: &str, body: &str) -> Result<ApiResponse, crate::Error>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}
