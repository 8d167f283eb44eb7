//! Sokushuu landing API binary.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (YAML file, then environment overrides)
//! 2. Initialize structured logging (tracing)
//! 3. Build the configured KV store
//! 4. Serve HTTP until `Ctrl-C`

use std::sync::Arc;

use sokushuu_api::startup::{connect_store, init_tracing};
use sokushuu_api::{ApiConfig, AppState, start_server};
use tracing::info;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, store setup, or the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig::from_env()?;
    init_tracing(&config.logging);

    info!(
        host = %config.server.host,
        port = config.server.port,
        "sokushuu-api starting"
    );

    let kv = connect_store(&config.kv).await?;
    info!(backend = kv.name(), "KV store ready");

    let state = Arc::new(AppState::new(kv));
    start_server(&config.server, state).await?;

    info!("sokushuu-api shut down");
    Ok(())
}
