//! Redirect synchronizer
//!
//! The `RedirectSynchronizer` makes sure a content record has a matching
//! redirect on Help Scout Docs, pointing the Help Scout copy of an article
//! at the record's permalink.
//!
//! ## Flow
//!
//! ```text
//! create(record_id)
//!     │
//!     ├── read _helpscout_data
//!     │
//!     ├── redirectId stored? ── yes ──► PUT redirects/{id} ──┐
//!     │                                                      │
//!     └── no ──► build body ──► POST redirects ──────────────┤
//!                                                            ▼
//!                                          200? store redirectId from Location
//! ```
//!
//! A record is either unlinked (no `redirectId`) or linked. The first
//! successful create links it; every later sync updates in place.

pub mod data;

pub use data::{HelpscoutData, RedirectBody};

use crate::config::HelpscoutConfig;
use crate::error::{Error, Result};
use crate::traits::{ApiResponse, DocsTransport, MetadataStore, PermalinkResolver, RecordId};
use tracing::{debug, info, warn};

/// Meta key the Help Scout mapping is stored under
pub const HELPSCOUT_META_KEY: &str = "_helpscout_data";

/// Prefix of the `Location` header returned when a redirect is created
pub const REDIRECT_LOCATION_PREFIX: &str = "https://docsapi.helpscout.net/v1/redirects/";

/// API path of the redirects collection
const REDIRECTS_PATH: &str = "redirects";

/// Which remote call a sync performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    /// A new redirect was created
    Created,
    /// An existing redirect was updated
    Updated,
}

/// Result of a successful `create`
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SyncOutcome {
    /// Remote call performed
    pub action: SyncAction,
    /// Raw response from the Docs API
    pub response: ApiResponse,
    /// Metadata as persisted after the call
    pub data: HelpscoutData,
}

/// Keeps Help Scout redirects in step with content records
///
/// ## Threading
///
/// Calls are independent and hold no locks across the network call, so
/// two syncs of the same record running at once can lose a metadata write.
pub struct RedirectSynchronizer {
    /// Sent verbatim as `siteId`
    site_id: String,

    /// Per-record metadata
    store: Box<dyn MetadataStore>,

    /// Destination URLs
    permalinks: Box<dyn PermalinkResolver>,

    /// Docs API
    transport: Box<dyn DocsTransport>,
}

impl RedirectSynchronizer {
    /// Create a new synchronizer
    ///
    /// # Parameters
    ///
    /// - `store`: Metadata store holding `_helpscout_data`
    /// - `permalinks`: Permalink resolver
    /// - `transport`: Docs API transport
    /// - `config`: Configuration (only `site_id` is used here)
    pub fn new(
        store: Box<dyn MetadataStore>,
        permalinks: Box<dyn PermalinkResolver>,
        transport: Box<dyn DocsTransport>,
        config: &HelpscoutConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            site_id: config.site_id.clone(),
            store,
            permalinks,
            transport,
        })
    }

    /// Create the record's redirect, or update it if the record is already linked
    ///
    /// # Returns
    ///
    /// - `Ok(SyncOutcome)`: Remote call succeeded and metadata was recorded
    /// - `Err(Error::MissingSlugData)`: No `slug`/`number`; nothing was sent
    /// - `Err(Error::RequestFailed)`: Transport error or non-200 status;
    ///   metadata untouched
    pub async fn create(&self, record_id: RecordId) -> Result<SyncOutcome> {
        let data = self.helpscout_data(record_id).await?;

        if let Some(redirect_id) = data.linked_redirect_id() {
            let response = self.update(redirect_id, record_id).await?;
            let data = self.record_response(&response, record_id).await?;
            info!("Updated Help Scout redirect {} for record {}", redirect_id, record_id);

            return Ok(SyncOutcome {
                action: SyncAction::Updated,
                response,
                data,
            });
        }

        let Some(body) = self.request_body(record_id).await? else {
            warn!("Record {} has no Help Scout slug/number, skipping", record_id);
            return Err(Error::missing_slug(record_id));
        };

        let response = self.send_post(REDIRECTS_PATH, &body.to_json()?).await?;
        let data = self.record_response(&response, record_id).await?;
        info!(
            "Created Help Scout redirect {} for record {}",
            data.redirect_id.as_deref().unwrap_or("<unknown>"),
            record_id
        );

        Ok(SyncOutcome {
            action: SyncAction::Created,
            response,
            data,
        })
    }

    /// Update an existing redirect to the record's current slug and permalink
    ///
    /// The response is returned as-is; status codes are not checked and no
    /// metadata is written. `create` does that after delegating here.
    pub async fn update(&self, redirect_id: &str, record_id: RecordId) -> Result<ApiResponse> {
        let Some(body) = self.request_body(record_id).await? else {
            warn!("Record {} has no Help Scout slug/number, skipping", record_id);
            return Err(Error::missing_slug(record_id));
        };

        let path = format!("{}/{}", REDIRECTS_PATH, redirect_id);
        self.send_put(&path, &body.to_json()?).await
    }

    /// Build the create/update body for a record
    ///
    /// Returns `Ok(None)` when the record has no slug data.
    pub async fn request_body(&self, record_id: RecordId) -> Result<Option<RedirectBody>> {
        let Some(url_mapping) = self.helpscout_slug(record_id).await? else {
            return Ok(None);
        };

        let redirect = self.permalinks.permalink(record_id).await?;
        debug!("Redirect for record {}: {} -> {}", record_id, url_mapping, redirect);

        Ok(Some(RedirectBody {
            site_id: self.site_id.clone(),
            url_mapping,
            redirect,
        }))
    }

    /// Help Scout path of the record's article: `/article/{number}-{slug}`
    ///
    /// Returns `Ok(None)` if `number` or `slug` is missing.
    pub async fn helpscout_slug(&self, record_id: RecordId) -> Result<Option<String>> {
        Ok(self.helpscout_data(record_id).await?.article_path())
    }

    /// Read the record's `_helpscout_data` (empty if never written)
    pub async fn helpscout_data(&self, record_id: RecordId) -> Result<HelpscoutData> {
        let value = self.store.get(record_id, HELPSCOUT_META_KEY).await?;
        debug!("Read Help Scout metadata for record {}", record_id);
        HelpscoutData::from_meta(record_id, value)
    }

    /// Persist pending metadata writes
    pub async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }

    /// Record the redirect ID from a successful response
    ///
    /// Only an exact 200 counts as success. The ID comes from the
    /// `Location` header with the API prefix removed; a missing or empty
    /// header (normal for updates) leaves the stored ID alone.
    async fn record_response(
        &self,
        response: &ApiResponse,
        record_id: RecordId,
    ) -> Result<HelpscoutData> {
        if response.status != 200 {
            warn!(
                "Help Scout request for record {} returned status {}",
                record_id, response.status
            );
            return Err(Error::request_failed(
                Some(response.status),
                format!("unexpected status {}", response.status),
            ));
        }

        let mut data = self.helpscout_data(record_id).await?;
        if let Some(redirect_id) = redirect_id_from_response(response) {
            data.redirect_id = Some(redirect_id);
        }

        self.store
            .set(record_id, HELPSCOUT_META_KEY, &data.to_meta()?)
            .await?;

        Ok(data)
    }

    async fn send_post(&self, path: &str, body: &str) -> Result<ApiResponse> {
        info!("POST {} via {}", path, self.transport.transport_name());
        self.transport
            .post(path, body)
            .await
            .map_err(|e| transport_failure(path, e))
    }

    async fn send_put(&self, path: &str, body: &str) -> Result<ApiResponse> {
        info!("PUT {} via {}", path, self.transport.transport_name());
        self.transport
            .put(path, body)
            .await
            .map_err(|e| transport_failure(path, e))
    }
}

/// Extract the bare redirect ID from a response's `Location` header
pub fn redirect_id_from_response(response: &ApiResponse) -> Option<String> {
    let location = response.header("Location")?.trim();
    let id = location
        .strip_prefix(REDIRECT_LOCATION_PREFIX)
        .unwrap_or(location);
    (!id.is_empty()).then(|| id.to_string())
}

fn transport_failure(path: &str, err: Error) -> Error {
    warn!("Help Scout request to {} failed: {}", path, err);
    Error::request_failed(None, err.to_string())
}
