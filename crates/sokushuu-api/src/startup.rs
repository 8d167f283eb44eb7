//! Wiring from configuration to a running store and log subscriber.

use sokushuu_kv::{KvError, KvStore, MemoryKv};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, KvBackend, KvConfig, LogFormat, LoggingConfig};

/// Errors that can occur while preparing the API to serve.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration was incomplete or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The KV store could not be constructed or reached.
    #[error(transparent)]
    Kv(#[from] KvError),
}

/// Build the KV store selected by `config`.
///
/// # Errors
///
/// Returns [`StartupError::Config`] if credentials for the Cloudflare
/// backend are missing, or [`StartupError::Kv`] if the store cannot be
/// created or connected.
pub async fn connect_store(config: &KvConfig) -> Result<KvStore, StartupError> {
    let store = match config.backend {
        KvBackend::Cloudflare => {
            let cloudflare = config.cloudflare()?;
            info!(
                api_url = %cloudflare.api_url,
                account_id = %cloudflare.account_id,
                namespace_id = %cloudflare.namespace_id,
                timeout_ms = config.timeout_ms,
                "using Cloudflare Workers KV"
            );
            KvStore::cloudflare(&cloudflare)?
        }
        KvBackend::Redis => {
            info!(redis_url = %config.redis_url, "connecting to Redis KV");
            KvStore::redis(&config.redis_url).await?
        }
        KvBackend::Memory => {
            warn!("using in-memory KV store; data is lost on restart");
            KvStore::from(MemoryKv::new())
        }
    };
    Ok(store)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
