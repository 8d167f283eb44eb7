//! Waiting list subscription payloads.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Body of `POST /api/waitlist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SubscribeRequest {
    /// Address to notify at launch.
    pub email: String,
}

/// Result of a subscription attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SubscribeResponse {
    /// Whether the address is now on the waiting list.
    pub success: bool,
    /// Human-readable message shown under the form.
    pub message: String,
}

impl SubscribeResponse {
    /// A successful subscription with the given message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failed subscription with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Outcome of validating user input such as an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ValidationOutcome {
    /// Whether the input is acceptable.
    pub is_valid: bool,
    /// Why the input was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

impl ValidationOutcome {
    /// Accepted input.
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    /// Rejected input with a message suitable for display.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// JSON body returned with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ApiErrorBody {
    /// Error message.
    pub error: String,
    /// HTTP status code repeated in the body.
    pub status: u16,
}
