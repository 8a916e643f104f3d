//! Configuration types for the redirect sync
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Default Help Scout Docs API root
pub const DEFAULT_API_BASE_URL: &str = "https://docsapi.helpscout.net/v1";

/// Default permalink template (the CMS's plain `?p=` form)
pub const DEFAULT_PERMALINK_TEMPLATE: &str = "https://example.com/?p={id}";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpscoutConfig {
    /// Help Scout Docs site the redirects belong to, sent verbatim as `siteId`
    pub site_id: String,

    /// Docs API settings
    pub api: DocsApiConfig,

    /// Metadata store configuration
    #[serde(default)]
    pub metadata_store: MetadataStoreConfig,

    /// Permalink resolution
    #[serde(default)]
    pub permalink: PermalinkConfig,
}

impl HelpscoutConfig {
    /// Create a configuration for a site, with defaults everywhere else
    pub fn new(site_id: impl Into<String>) -> Self {
        Self {
            site_id: site_id.into(),
            api: DocsApiConfig::default(),
            metadata_store: MetadataStoreConfig::default(),
            permalink: PermalinkConfig::default(),
        }
    }

    /// Validate the parts the synchronizer depends on
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.site_id.trim().is_empty() {
            return Err(crate::Error::config("Help Scout site ID cannot be empty"));
        }

        self.permalink.validate()?;
        self.metadata_store.validate()?;

        Ok(())
    }
}

/// Help Scout Docs API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DocsApiConfig {
    /// Docs API key
    /// ⚠️ NEVER log this value
    pub api_key: String,

    /// API root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl DocsApiConfig {
    /// Create an API configuration with the default endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Point the configuration at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Validate the API configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_key.is_empty() {
            return Err(crate::Error::config("Help Scout Docs API key cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Docs API base URL must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Docs API timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for DocsApiConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DocsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocsApiConfig")
            .field("api_key", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Metadata store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetadataStoreConfig {
    /// File-based metadata store
    File {
        /// Path to the JSON file
        path: String,
    },

    /// In-memory metadata store (not persistent)
    #[default]
    Memory,
}

impl MetadataStoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            MetadataStoreConfig::File { path } if path.is_empty() => Err(crate::Error::config(
                "Metadata store path cannot be empty for a file store",
            )),
            _ => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &'static str {
        match self {
            MetadataStoreConfig::File { .. } => "file",
            MetadataStoreConfig::Memory => "memory",
        }
    }
}

/// Permalink resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermalinkConfig {
    /// URL template; `{id}` is replaced with the record ID
    #[serde(default = "default_permalink_template")]
    pub template: String,
}

impl PermalinkConfig {
    /// Validate the permalink template
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.template.contains("{id}") {
            return Err(crate::Error::config(format!(
                "Permalink template must contain {{id}}. Got: {}",
                self.template
            )));
        }
        Ok(())
    }
}

impl Default for PermalinkConfig {
    fn default() -> Self {
        Self {
            template: default_permalink_template(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_permalink_template() -> String {
    DEFAULT_PERMALINK_TEMPLATE.to_string()
}
