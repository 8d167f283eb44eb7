//! The [`KvStore`] dispatch enum.
//!
//! Uses enum dispatch instead of trait objects because async methods are
//! not dyn-compatible.

use crate::cloudflare::{CloudflareConfig, CloudflareKv};
use crate::error::KvError;
use crate::memory::MemoryKv;
use crate::redis::RedisKv;

/// A KV store the landing API can read from and write to.
#[derive(Debug, Clone)]
pub enum KvStore {
    /// Cloudflare Workers KV over its REST API.
    Cloudflare(CloudflareKv),
    /// Redis or `Dragonfly`.
    Redis(RedisKv),
    /// In-process map.
    Memory(MemoryKv),
}

impl KvStore {
    /// Build a Workers KV backed store.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Config`] if the client cannot be constructed.
    pub fn cloudflare(config: &CloudflareConfig) -> Result<Self, KvError> {
        CloudflareKv::new(config).map(Self::Cloudflare)
    }

    /// Connect a Redis-compatible store.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if the URL is invalid or the connection fails.
    pub async fn redis(url: &str) -> Result<Self, KvError> {
        RedisKv::connect(url).await.map(Self::Redis)
    }

    /// Read the raw string at `key`. A missing key is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if the store cannot be read.
    pub async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        match self {
            Self::Cloudflare(kv) => kv.get(key).await,
            Self::Redis(kv) => kv.get(key).await,
            Self::Memory(kv) => kv.get(key).await,
        }
    }

    /// Store `value` at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if the store rejects or cannot receive the write.
    pub async fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        match self {
            Self::Cloudflare(kv) => kv.put(key, value).await,
            Self::Redis(kv) => kv.put(key, value).await,
            Self::Memory(kv) => kv.put(key, value).await,
        }
    }

    /// Add one to the counter at `key` and return the new value.
    ///
    /// Redis uses `INCR` and the in-memory store holds its lock across the
    /// update, so neither loses concurrent increments. Workers KV reads and
    /// then writes. A missing or non-numeric counter counts as zero.
    ///
    /// # Errors
    ///
    /// Returns [`KvError`] if the counter cannot be read or written.
    pub async fn increment(&self, key: &str) -> Result<u64, KvError> {
        match self {
            Self::Cloudflare(kv) => kv.increment(key).await,
            Self::Redis(kv) => kv.increment(key).await,
            Self::Memory(kv) => kv.increment(key).await,
        }
    }

    /// Human-readable backend name for logging and health output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cloudflare(_) => "cloudflare",
            Self::Redis(_) => "redis",
            Self::Memory(_) => "memory",
        }
    }
}

impl From<MemoryKv> for KvStore {
    fn from(kv: MemoryKv) -> Self {
        Self::Memory(kv)
    }
}
