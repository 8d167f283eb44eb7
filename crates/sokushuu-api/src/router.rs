//! Axum router construction for the landing API.
//!
//! Assembles all routes into a single [`Router`] with CORS enabled so the
//! landing page can call the API from its own origin.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::statistics;
use crate::waitlist;

/// Build the complete Axum router for the landing API.
///
/// The router includes:
/// - `GET /` -- plain-text banner
/// - `GET /health` -- liveness and KV backend name
/// - `GET /api/statistics/launch-date` -- launch date with fallback
/// - `GET /api/statistics/waiting-total` -- waiting list size with fallback
/// - `POST /api/waitlist` -- join the waiting list
///
/// CORS allows any origin: the endpoints serve public marketing data.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let statistics = Router::new()
        .route("/launch-date", get(statistics::launch_date))
        .route("/waiting-total", get(statistics::waiting_total));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .nest("/api/statistics", statistics)
        .route("/api/waitlist", post(waitlist::subscribe))
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
