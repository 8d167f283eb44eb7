//! Error types for KV store access.
//!
//! A missing key is never an error: every backend reports it as `Ok(None)`.
//! [`KvError`] is reserved for the store being unreachable or misbehaving.

/// Errors that can occur while talking to a KV store.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// The HTTP request never produced a response (DNS, TLS, timeout, ...).
    #[error("KV request failed: {0}")]
    Transport(String),

    /// The KV API answered with a non-2xx status other than 404.
    #[error("KV API error: {status} {reason} - {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for `status`.
        reason: String,
        /// Response body, as returned.
        body: String,
    },

    /// A Redis/Dragonfly operation failed.
    #[error("Redis error: {0}")]
    Redis(#[from] fred::error::Error),

    /// The store is deliberately unavailable (in-memory failure injection).
    #[error("KV store unavailable: {0}")]
    Unavailable(String),

    /// The key is longer than the store accepts.
    #[error("KV key is {bytes} bytes, limit is {max}")]
    KeyTooLong {
        /// Length of the rejected key in UTF-8 bytes.
        bytes: usize,
        /// Largest accepted length.
        max: usize,
    },

    /// The client could not be built from its configuration.
    #[error("KV configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for KvError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
