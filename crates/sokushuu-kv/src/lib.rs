//! Key-value store access for the Sokushuu landing API.
//!
//! The landing page keeps its live numbers in a managed KV namespace. This
//! crate hides which store is behind the API behind one enum, [`KvStore`],
//! so handlers only ever see `get`/`put` on string values.
//!
//! # Backends
//!
//! ```text
//! KvStore
//!     |
//!     +-- Cloudflare --> Workers KV REST API (production)
//!     +-- Redis ------> Redis / Dragonfly (local development)
//!     +-- Memory -----> in-process map (tests, offline runs)
//! ```
//!
//! # Modules
//!
//! - [`cloudflare`] -- Workers KV REST client over `reqwest`
//! - [`redis`] -- Redis-compatible client over `fred`
//! - [`memory`] -- In-memory store with failure injection
//! - [`store`] -- The [`KvStore`] dispatch enum
//! - [`keys`] -- Fixed key names
//! - [`error`] -- Shared error type

pub mod cloudflare;
pub mod error;
pub mod keys;
pub mod memory;
pub mod redis;
pub mod store;

// Re-export primary types for convenience.
pub use cloudflare::{CloudflareConfig, CloudflareKv};
pub use error::KvError;
pub use memory::MemoryKv;
pub use redis::RedisKv;
pub use store::KvStore;
