//! Statistics payloads served under `/api/statistics`.
//!
//! Both endpoints always answer `200 OK`. The [`DataSource`] field tells the
//! frontend whether the value is live or a substituted default.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Where a statistics value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DataSource {
    /// Read from the KV store.
    Kv,
    /// The key was absent, a hardcoded default was used.
    Fallback,
    /// The KV store could not be reached or answered with an error.
    FallbackError,
}

impl DataSource {
    /// The wire name of this source (`kv`, `fallback`, `fallback_error`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kv => "kv",
            Self::Fallback => "fallback",
            Self::FallbackError => "fallback_error",
        }
    }
}

impl core::fmt::Display for DataSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response body of `GET /api/statistics/launch-date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LaunchDateResponse {
    /// ISO 8601 launch timestamp. Passed through verbatim when read from KV.
    pub launch_date: String,
    /// Origin of `launch_date`.
    pub source: DataSource,
    /// When this response was produced (ISO 8601, millisecond precision).
    pub timestamp: String,
    /// Upstream failure message, only present for [`DataSource::FallbackError`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

/// Response body of `GET /api/statistics/waiting-total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WaitingTotalResponse {
    /// Number of people on the waiting list.
    ///
    /// Never negative: a stored negative number (`"-5"`) is reported as 0,
    /// with the stored text still visible in `raw_value`.
    pub waiting_total: u64,
    /// Origin of `waiting_total`.
    pub source: DataSource,
    /// The stored string before parsing, only present for [`DataSource::Kv`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub raw_value: Option<String>,
    /// When this response was produced (ISO 8601, millisecond precision).
    pub timestamp: String,
    /// Upstream failure message, only present for [`DataSource::FallbackError`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

/// Format a timestamp the way browsers' `Date.toISOString()` does,
/// e.g. `2025-08-24T00:00:00.000Z`.
pub fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
