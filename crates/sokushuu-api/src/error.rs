//! Error types for the landing API.
//!
//! Statistics endpoints never produce an [`ApiError`]: their failures are
//! folded into fallback payloads. This type covers requests the API cannot
//! make sense of.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sokushuu_types::ApiErrorBody;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No route matches the request.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::NotFound(msg) | Self::BadRequest(msg) => msg,
        };

        let body = ApiErrorBody {
            error: message,
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}
