//! In-process KV store.
//!
//! Backs tests and offline runs. [`MemoryKv::fail_with`] makes every
//! subsequent call fail so callers' degraded paths can be exercised without
//! a network.

use std::collections::BTreeMap;
use std::sync::Arc;

use sokushuu_core::{next_waiting_total, parse_waiting_total};
use tokio::sync::RwLock;

use crate::error::KvError;

/// A string-to-string map behind an async lock.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl MemoryKv {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
            failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Make every following operation fail with `message`.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    /// Undo [`fail_with`](Self::fail_with).
    pub async fn recover(&self) {
        *self.failure.write().await = None;
    }

    /// Read the value at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Unavailable`] while a failure is injected.
    pub async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        self.check().await?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    /// Store `value` at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Unavailable`] while a failure is injected.
    pub async fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.check().await?;
        self.entries
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    /// Add one to the counter at `key` and return the new value.
    ///
    /// The read and the write happen under one lock, so concurrent
    /// increments are never lost. A missing or non-numeric value counts
    /// as zero.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Unavailable`] while a failure is injected.
    pub async fn increment(&self, key: &str) -> Result<u64, KvError> {
        self.check().await?;
        let mut entries = self.entries.write().await;
        let current = entries.get(key).map_or(0, |raw| parse_waiting_total(raw));
        let next = next_waiting_total(current);
        entries.insert(key.to_owned(), next.to_string());
        Ok(next)
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn check(&self) -> Result<(), KvError> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(KvError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}
