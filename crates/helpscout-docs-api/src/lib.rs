// # Help Scout Docs API Transport
//
// This crate provides the reqwest-based `DocsTransport` used to create and
// update redirects on Help Scout Docs.
//
// ## Behavior
//
// - One HTTP request per call; no retries, no caching
// - Any HTTP status is returned as a response; only transport failures
//   (connect, timeout, unreadable body) become errors
// - Request bodies are sent byte-for-byte as given
//
// ## Security Requirements
//
// - API key NEVER appears in logs or `Debug` output
// - Construction fails fast if the key is empty
//
// ## API Reference
//
// - Docs API v1: https://developer.helpscout.com/docs-api/
// - Create Redirect: POST `/v1/redirects`
// - Update Redirect: PUT `/v1/redirects/{id}`
// - Auth: HTTP Basic, API key as username, `X` as password

use async_trait::async_trait;
use helpscout_core::config::DocsApiConfig;
use helpscout_core::traits::{ApiResponse, DocsTransport};
use helpscout_core::{Error, Result};
use std::time::Duration;

/// Password paired with the API key in Basic auth; the Docs API ignores it
const BASIC_AUTH_PASSWORD: &str = "X";

/// Help Scout Docs API client
///
/// # Security
///
/// The Debug implementation does NOT expose the API key.
pub struct DocsApiClient {
    /// Docs API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// API root without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DocsApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsApiClient")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl DocsApiClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `api_key`: Docs API key
    /// - `base_url`: API root, e.g. `https://docsapi.helpscout.net/v1`
    /// - `timeout`: Per-request timeout
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("Help Scout Docs API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &DocsApiConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Full URL for an API path
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one request and collect status, headers and body
    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<ApiResponse> {
        let response = request
            .basic_auth(&self.api_key, Some(BASIC_AUTH_PASSWORD))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("HTTP request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response from {}: {}", url, e)))?;

        tracing::debug!("Docs API answered {} for {}", status, url);
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl DocsTransport for DocsApiClient {
    async fn post(&self, path: &str, body: &str) -> Result<ApiResponse> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        self.send(self.client.post(&url).body(body.to_string()), &url)
            .await
    }

    async fn put(&self, path: &str, body: &str) -> Result<ApiResponse> {
        let url = self.url(path);
        tracing::debug!("PUT {}", url);
        self.send(self.client.put(&url).body(body.to_string()), &url)
            .await
    }

    fn transport_name(&self) -> &'static str {
        "helpscout-docs-api"
    }
}
