//! `POST /api/waitlist` handler.
//!
//! Subscriptions are written through to the KV store:
//!
//! 1. Validate and normalize the address.
//! 2. If `SOKUSHUU_LANDING_PAGE_WAITLIST:{email}` exists, report success
//!    without counting the address twice.
//! 3. Store the subscriber key with the subscription time.
//! 4. Bump `SOKUSHUU_LANDING_PAGE_WAITING_TOTAL` with [`KvStore::increment`].
//!
//! Redis and the in-memory store increment atomically. Workers KV has no
//! atomic increment, so two simultaneous subscriptions there can both read
//! the same total. A failed counter update does not undo the subscription.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::Utc;
use sokushuu_core::normalize_email;
use sokushuu_kv::{KvError, KvStore, keys};
use sokushuu_types::{SubscribeRequest, SubscribeResponse, iso8601};
use tracing::{error, info, warn};
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

/// Shown after a new subscription.
pub const MSG_SUBSCRIBED: &str = "Successfully subscribed!";

/// Shown when the address was already on the list.
pub const MSG_ALREADY_SUBSCRIBED: &str = "You're already on the waiting list!";

/// Shown when the address does not fit in a storage key.
pub const MSG_TOO_LONG: &str = "Email address is too long";

/// Shown when the store could not record the subscription.
pub const MSG_FAILED: &str = "Subscription failed. Please try again.";

/// Validated form of a [`SubscribeRequest`].
#[derive(Debug, Clone, Validate)]
pub struct SubscribeForm {
    /// Address as submitted.
    #[validate(custom(function = "valid_email"))]
    pub email: String,
}

impl From<SubscribeRequest> for SubscribeForm {
    fn from(request: SubscribeRequest) -> Self {
        Self {
            email: request.email,
        }
    }
}

fn valid_email(email: &str) -> Result<(), validator::ValidationError> {
    sokushuu_core::email_rule(email)
}

/// Add an address to the waiting list.
///
/// Answers `200` on success, `400` with the validation message for a bad
/// address, and `502` if the KV store could not record it.
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] if the body is not a JSON
/// [`SubscribeRequest`].
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubscribeResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let form = SubscribeForm::from(request);

    if let Err(errors) = form.validate() {
        let message = first_message(&errors);
        info!(reason = %message, "subscription rejected");
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(SubscribeResponse::failed(message)),
        ));
    }

    let email = normalize_email(&form.email);
    match record_subscription(&state.kv, &email).await {
        Ok(Subscription::New { waiting_total }) => {
            info!(waiting_total, "new waiting list subscription");
            Ok((StatusCode::OK, Json(SubscribeResponse::ok(MSG_SUBSCRIBED))))
        }
        Ok(Subscription::Existing) => {
            info!("address already on the waiting list");
            Ok((
                StatusCode::OK,
                Json(SubscribeResponse::ok(MSG_ALREADY_SUBSCRIBED)),
            ))
        }
        Err(KvError::KeyTooLong { bytes, max }) => {
            info!(bytes, max, "subscription rejected: key too long");
            Ok((
                StatusCode::BAD_REQUEST,
                Json(SubscribeResponse::failed(MSG_TOO_LONG)),
            ))
        }
        Err(e) => {
            error!(error = %e, "failed to record subscription");
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(SubscribeResponse::failed(MSG_FAILED)),
            ))
        }
    }
}

/// What [`record_subscription`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// The address was added. `waiting_total` is the counter written, or
    /// `None` if the counter could not be updated.
    New {
        /// New waiting list size.
        waiting_total: Option<u64>,
    },
    /// The address was already present; nothing was written.
    Existing,
}

/// Write `email` (already normalized) through to the store.
///
/// # Errors
///
/// Returns [`KvError::KeyTooLong`] if the address does not fit in a key,
/// or another [`KvError`] if the subscriber key could not be checked or
/// written. Counter failures are logged, not returned.
pub async fn record_subscription(kv: &KvStore, email: &str) -> Result<Subscription, KvError> {
    let entry = keys::waitlist_entry(email)?;
    if kv.get(&entry).await?.is_some() {
        return Ok(Subscription::Existing);
    }
    kv.put(&entry, &iso8601(Utc::now())).await?;

    let waiting_total = match kv.increment(keys::WAITING_TOTAL).await {
        Ok(total) => Some(total),
        Err(e) => {
            warn!(error = %e, "subscriber stored but waiting total not updated");
            None
        }
    };
    Ok(Subscription::New { waiting_total })
}

/// The first human-readable message in a set of validation errors.
fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| String::from(sokushuu_core::validation::MSG_INVALID))
}
