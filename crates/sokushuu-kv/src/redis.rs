//! Redis-compatible (Redis, `Dragonfly`) KV backend.
//!
//! Used for local development when no Cloudflare credentials are at hand.
//! Values are stored as plain strings under the same key names as in
//! Workers KV, so a seeded local instance behaves like production.

use fred::prelude::*;
use sokushuu_core::{next_waiting_total, parse_waiting_total};

use crate::error::KvError;

/// Connection handle to a Redis-compatible instance.
///
/// Wraps a [`fred::prelude::Client`]. Cloning is cheap and shares the
/// underlying connection.
#[derive(Clone)]
pub struct RedisKv {
    client: Client,
}

impl RedisKv {
    /// Connect to the instance at `url`.
    ///
    /// The URL follows the Redis scheme: `redis://host:port` or
    /// `redis://host:port/db`.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Config`] if the URL cannot be parsed.
    /// Returns [`KvError::Redis`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, KvError> {
        let config = Config::from_url(url)
            .map_err(|e| KvError::Config(format!("invalid Redis URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to Redis KV backend");
        Ok(Self { client })
    }

    /// Read the string at `key`, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Redis`] if the read fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let value: Option<String> = self.client.get(key).await?;
        Ok(value)
    }

    /// Store `value` at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Redis`] if the write fails.
    pub async fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        let _: () = self.client.set(key, value, None, None, false).await?;
        Ok(())
    }

    /// Add one to the counter at `key` with `INCR` and return the new value.
    ///
    /// `INCR` is atomic, so concurrent subscriptions are all counted. When the
    /// stored text is not an integer Redis refuses the increment; the value
    /// is then parsed leniently and overwritten, as on the other backends.
    /// A negative counter restarts at 1.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Redis`] if a command fails for any other reason.
    pub async fn increment(&self, key: &str) -> Result<u64, KvError> {
        match self.client.incr::<i64, _>(key).await {
            Ok(total) => match u64::try_from(total) {
                Ok(total) if total > 0 => Ok(total),
                _ => {
                    let first = next_waiting_total(0);
                    self.put(key, &first.to_string()).await?;
                    Ok(first)
                }
            },
            Err(e) if is_not_integer(&e) => {
                tracing::warn!(key, error = %e, "counter is not an integer, rewriting");
                let current = self.get(key).await?.map_or(0, |raw| parse_waiting_total(&raw));
                let next = next_waiting_total(current);
                self.put(key, &next.to_string()).await?;
                Ok(next)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Redis`] if the delete fails.
    pub async fn delete(&self, key: &str) -> Result<(), KvError> {
        let _: u32 = self.client.del(key).await?;
        Ok(())
    }
}

/// Whether Redis rejected an `INCR` because of the stored value.
fn is_not_integer(err: &fred::error::Error) -> bool {
    let details = err.details();
    details.contains("not an integer") || details.contains("overflow")
}

impl core::fmt::Debug for RedisKv {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RedisKv").finish_non_exhaustive()
    }
}
