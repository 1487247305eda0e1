//! # In-Memory KeyValueStore Implementation

use async_trait::async_trait;
use ringlog_core::port::KeyValueStore;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// In-memory KeyValueStore implementation.
///
/// Clones share the same map, so several buffers or loggers can be pointed
/// at one store the way several processes would share a server.
///
/// # Examples
///
/// ```rust
/// use ringlog_local::InMemoryKeyValueStore;
///
/// let store = InMemoryKeyValueStore::new();
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Create a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub async fn len(&self) -> usize {
        self.values.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.lock().await.is_empty()
    }

    /// Sorted copy of every key and value.
    pub async fn snapshot(&self) -> BTreeMap<String, String> {
        self.values
            .lock()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    type Error = InMemoryKeyValueStoreError;

    async fn set(&self, key: &str, value: &str) -> Result<bool, Self::Error> {
        let mut values = self.values.lock().await;
        values.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let values = self.values.lock().await;
        Ok(values.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<bool, Self::Error> {
        let mut values = self.values.lock().await;
        Ok(values.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        let values = self.values.lock().await;
        Ok(values.contains_key(key))
    }

    async fn increment(&self, key: &str) -> Result<i64, Self::Error> {
        let mut values = self.values.lock().await;

        let current = match values.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| InMemoryKeyValueStoreError::NotAnInteger(key.to_string()))?,
            None => 0,
        };
        let next = current
            .checked_add(1)
            .ok_or_else(|| InMemoryKeyValueStoreError::Overflow(key.to_string()))?;

        values.insert(key.to_string(), next.to_string());
        Ok(next)
    }
}

/// Errors from [`InMemoryKeyValueStore`] operations.
#[derive(Debug, Error)]
pub enum InMemoryKeyValueStoreError {
    /// The value under the key is not an integer.
    #[error("Value at {0} is not an integer")]
    NotAnInteger(String),

    /// Incrementing would overflow a 64-bit integer.
    #[error("Increment would overflow at {0}")]
    Overflow(String),
}
