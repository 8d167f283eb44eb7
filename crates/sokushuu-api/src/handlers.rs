//! Liveness and fallback handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Plain-text banner |
//! | `GET` | `/health` | Status and active KV backend |
//! | `*` | anything else | `404` JSON error |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::Uri;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `GET /`.
pub const BANNER: &str = "Sokushuu landing API";

/// Serve the plain-text banner.
pub async fn index() -> &'static str {
    BANNER
}

/// Report that the server is up and which KV backend it uses.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "kv_backend": state.kv.name(),
    }))
}

/// Answer unknown routes with a JSON `404`.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
