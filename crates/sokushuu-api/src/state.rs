//! Shared application state for the landing API.

use sokushuu_kv::KvStore;

/// Shared state for the Axum application.
///
/// Wrapped in [`std::sync::Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The KV store holding the landing page statistics.
    pub kv: KvStore,
}

impl AppState {
    /// Create application state around a KV store.
    pub const fn new(kv: KvStore) -> Self {
        Self { kv }
    }
}
