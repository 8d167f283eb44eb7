//! Landing page API for Sokushuu.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Statistics endpoints** (`/api/statistics/launch-date`,
//!   `/api/statistics/waiting-total`) that read one KV key each and never
//!   fail: a missing key or an unreachable store degrades to a fallback
//!   value, flagged by the `source` field.
//! - **Waiting list subscription** (`POST /api/waitlist`) that validates the
//!   address and writes it through to the KV store.
//! - **Liveness** (`GET /`, `GET /health`).
//!
//! # Architecture
//!
//! ```text
//! request --> router --> handler --> KvStore (Cloudflare | Redis | Memory)
//!                            |
//!                            +--> fallback on miss / error (HTTP 200)
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod statistics;
pub mod waitlist;

// Re-export primary types for convenience.
pub use config::{ApiConfig, ConfigError};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
