//! `GET /api/statistics/*` handlers.
//!
//! Each handler performs exactly one KV read and always answers `200 OK`.
//!
//! | KV result | `source` | Value |
//! |-----------|----------|-------|
//! | value present | `kv` | the stored value |
//! | key missing | `fallback` | now (launch date), 0 (waiting total) |
//! | any error | `fallback_error` | same as `fallback`, plus `error` |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use sokushuu_core::parse_waiting_total;
use sokushuu_kv::{KvError, keys};
use sokushuu_types::{DataSource, LaunchDateResponse, WaitingTotalResponse, iso8601};
use tracing::{error, info};

use crate::state::AppState;

/// Return the launch date stored in KV, or the current time.
pub async fn launch_date(State(state): State<Arc<AppState>>) -> Json<LaunchDateResponse> {
    info!(key = keys::LAUNCH_DATE, "fetching launch date from KV");
    let result = state.kv.get(keys::LAUNCH_DATE).await;
    let response = launch_date_response(result, Utc::now());
    info!(source = %response.source, launch_date = %response.launch_date, "launch date served");
    Json(response)
}

/// Return the waiting list size stored in KV, or 0.
pub async fn waiting_total(State(state): State<Arc<AppState>>) -> Json<WaitingTotalResponse> {
    info!(key = keys::WAITING_TOTAL, "fetching waiting list total from KV");
    let result = state.kv.get(keys::WAITING_TOTAL).await;
    let response = waiting_total_response(result, Utc::now());
    info!(source = %response.source, waiting_total = response.waiting_total, "waiting total served");
    Json(response)
}

/// Build the launch date payload from a KV read made at `now`.
///
/// A stored value is passed through verbatim, even if it is not a valid
/// timestamp: the KV entry is the operator's source of truth.
pub fn launch_date_response(
    result: Result<Option<String>, KvError>,
    now: DateTime<Utc>,
) -> LaunchDateResponse {
    let timestamp = iso8601(now);
    match result {
        Ok(Some(launch_date)) => LaunchDateResponse {
            launch_date,
            source: DataSource::Kv,
            timestamp,
            error: None,
        },
        Ok(None) => {
            info!("launch date not found in KV, using current time");
            LaunchDateResponse {
                launch_date: timestamp.clone(),
                source: DataSource::Fallback,
                timestamp,
                error: None,
            }
        }
        Err(e) => {
            error!(error = %e, "failed to fetch launch date");
            LaunchDateResponse {
                launch_date: timestamp.clone(),
                source: DataSource::FallbackError,
                timestamp,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Build the waiting total payload from a KV read made at `now`.
///
/// Stored values are parsed leniently; anything non-numeric counts as 0 but
/// is still reported as `raw_value`.
pub fn waiting_total_response(
    result: Result<Option<String>, KvError>,
    now: DateTime<Utc>,
) -> WaitingTotalResponse {
    let timestamp = iso8601(now);
    match result {
        Ok(Some(raw)) => WaitingTotalResponse {
            waiting_total: parse_waiting_total(&raw),
            source: DataSource::Kv,
            raw_value: Some(raw),
            timestamp,
            error: None,
        },
        Ok(None) => {
            info!("waiting total not found in KV, using 0");
            WaitingTotalResponse {
                waiting_total: 0,
                source: DataSource::Fallback,
                raw_value: None,
                timestamp,
                error: None,
            }
        }
        Err(e) => {
            error!(error = %e, "failed to fetch waiting total");
            WaitingTotalResponse {
                waiting_total: 0,
                source: DataSource::FallbackError,
                raw_value: None,
                timestamp,
                error: Some(e.to_string()),
            }
        }
    }
}
