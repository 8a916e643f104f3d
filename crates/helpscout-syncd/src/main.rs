// # helpscout-syncd - Help Scout redirect sync runner
//
// Thin integration layer: all sync logic lives in helpscout-core.
//
// The runner is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Wiring the metadata store, permalink resolver and Docs API client
// 4. Syncing the one record named on the command line
//
// ## Configuration
//
// - `HELPSCOUT_SITE_ID`: Help Scout Docs site ID (required)
// - `HELPSCOUT_API_KEY`: Docs API key (required)
// - `HELPSCOUT_API_BASE_URL`: API root (default: https://docsapi.helpscout.net/v1)
// - `HELPSCOUT_PERMALINK_TEMPLATE`: URL template with `{id}` (default: https://example.com/?p={id})
// - `HELPSCOUT_METADATA_STORE_TYPE`: `file` or `memory` (default: file)
// - `HELPSCOUT_METADATA_STORE_PATH`: Path to the metadata file (for file store)
// - `HELPSCOUT_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Seeding article data
//
// A record can only be synced once its Help Scout `slug` and `number` are
// known. With the file store they are seeded by writing the record into the
// metadata file before the first run (`last_updated` may be omitted):
//
// ```json
// {
//   "version": "1.0",
//   "records": {
//     "42": { "meta": { "_helpscout_data": { "slug": "install", "number": 7 } } }
//   }
// }
// ```
//
// Both values are used exactly as written. After a successful sync the same
// mapping also carries the `redirectId`.
//
// ## Example
//
// ```bash
// export HELPSCOUT_SITE_ID=5f1b2c
// export HELPSCOUT_API_KEY=your_key
// export HELPSCOUT_PERMALINK_TEMPLATE='https://docs.example.com/?p={id}'
// export HELPSCOUT_METADATA_STORE_PATH=/var/lib/helpscout/meta.json
//
// helpscout-syncd 42
// ```

use anyhow::{Context, Result};
use helpscout_core::config::{DocsApiConfig, HelpscoutConfig, MetadataStoreConfig, PermalinkConfig};
use helpscout_core::{RecordId, RedirectSynchronizer, TemplatePermalinkResolver};
use helpscout_docs_api::DocsApiClient;
use std::env;
use std::io::Write;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncExitCode {
    /// Record synced
    Success = 0,
    /// Configuration or startup failure
    ConfigError = 1,
    /// The sync itself failed
    SyncFailed = 2,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Runner configuration
struct Config {
    record_id: RecordId,
    site_id: String,
    api_key: String,
    api_base_url: Option<String>,
    permalink_template: Option<String>,
    metadata_store_type: String,
    metadata_store_path: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from the command line and environment variables
    fn from_env() -> Result<Self> {
        let record_id = env::args()
            .nth(1)
            .context("usage: helpscout-syncd <record_id>")?;
        let record_id = record_id
            .parse()
            .with_context(|| format!("Record ID must be a number. Got: {}", record_id))?;

        Ok(Self {
            record_id,
            site_id: env::var("HELPSCOUT_SITE_ID").context("HELPSCOUT_SITE_ID is required")?,
            api_key: env::var("HELPSCOUT_API_KEY").context("HELPSCOUT_API_KEY is required")?,
            api_base_url: env::var("HELPSCOUT_API_BASE_URL").ok(),
            permalink_template: env::var("HELPSCOUT_PERMALINK_TEMPLATE").ok(),
            metadata_store_type: env::var("HELPSCOUT_METADATA_STORE_TYPE")
                .unwrap_or_else(|_| "file".to_string()),
            metadata_store_path: env::var("HELPSCOUT_METADATA_STORE_PATH").ok(),
            log_level: env::var("HELPSCOUT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Translate into the library configuration and validate it
    fn to_helpscout_config(&self) -> Result<HelpscoutConfig> {
        let mut api = DocsApiConfig::new(self.api_key.clone());
        if let Some(ref base_url) = self.api_base_url {
            api = api.with_base_url(base_url.clone());
        }

        let metadata_store = match self.metadata_store_type.as_str() {
            "memory" => MetadataStoreConfig::Memory,
            "file" => MetadataStoreConfig::File {
                path: self.metadata_store_path.clone().context(
                    "HELPSCOUT_METADATA_STORE_PATH is required when HELPSCOUT_METADATA_STORE_TYPE=file",
                )?,
            },
            other => anyhow::bail!(
                "HELPSCOUT_METADATA_STORE_TYPE '{}' is not supported. \
                Supported types: file, memory",
                other
            ),
        };

        let permalink = match self.permalink_template {
            Some(ref template) => PermalinkConfig {
                template: template.clone(),
            },
            None => PermalinkConfig::default(),
        };

        let config = HelpscoutConfig {
            site_id: self.site_id.clone(),
            api,
            metadata_store,
            permalink,
        };
        config.validate()?;
        config.api.validate()?;
        Ok(config)
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "HELPSCOUT_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    let (config, helpscout_config, log_level) = match load_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    // Logs go to stderr; stdout carries the JSON result
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    rt.block_on(run(config.record_id, helpscout_config)).into()
}

fn load_config() -> Result<(Config, HelpscoutConfig, Level)> {
    let config = Config::from_env()?;
    let helpscout_config = config.to_helpscout_config()?;
    let log_level = config.log_level()?;
    Ok((config, helpscout_config, log_level))
}

/// Sync one record and print the outcome
async fn run(record_id: RecordId, config: HelpscoutConfig) -> SyncExitCode {
    let synchronizer = match build_synchronizer(&config).await {
        Ok(sync) => sync,
        Err(e) => {
            error!("Startup error: {:#}", e);
            return SyncExitCode::ConfigError;
        }
    };

    info!(
        "Syncing record {} (site {}, {} metadata store)",
        record_id,
        config.site_id,
        config.metadata_store.type_name()
    );

    sync_record(&synchronizer, record_id, &mut std::io::stdout()).await
}

/// Run `create`, write the outcome (or failure body) to `out`, then flush
///
/// A failed flush still leaves the outcome written; only the exit code changes.
async fn sync_record(
    synchronizer: &RedirectSynchronizer,
    record_id: RecordId,
    out: &mut impl Write,
) -> SyncExitCode {
    let (mut exit_code, rendered) = match synchronizer.create(record_id).await {
        Ok(outcome) => (
            SyncExitCode::Success,
            serde_json::to_string_pretty(&outcome).unwrap_or_else(|e| {
                serde_json::json!({ "error": format!("Failed to render outcome: {}", e) })
                    .to_string()
            }),
        ),
        Err(e) => {
            error!("Sync of record {} failed: {:?}", record_id, e);
            (SyncExitCode::SyncFailed, e.failure_body().to_string())
        }
    };

    if let Err(e) = writeln!(out, "{}", rendered) {
        error!("Failed to write outcome: {}", e);
    }

    if let Err(e) = synchronizer.flush().await {
        error!("Failed to flush metadata: {}", e);
        exit_code = SyncExitCode::SyncFailed;
    }

    exit_code
}

async fn build_synchronizer(config: &HelpscoutConfig) -> Result<RedirectSynchronizer> {
    let store = helpscout_core::store::from_config(&config.metadata_store).await?;
    let permalinks = TemplatePermalinkResolver::from_config(&config.permalink)?;
    let transport = DocsApiClient::from_config(&config.api)?;

    Ok(RedirectSynchronizer::new(
        store,
        Box::new(permalinks),
        Box::new(transport),
        config,
    )?)
}
