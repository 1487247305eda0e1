//! KeyValueStore port.
//!
//! This module defines the [`KeyValueStore`] trait, the only capability the
//! ring buffer needs from a storage backend.

use async_trait::async_trait;
use std::sync::Arc;

/// Minimal key-value capability consumed by the ring buffer.
///
/// Values are text. `get` distinguishes an absent key (`None`) from a key
/// holding an empty string.
///
/// # Atomicity
///
/// `increment` must be a true atomic primitive: concurrent callers, in this
/// process or any other sharing the backend, must each observe a distinct
/// post-increment value. An absent key counts as `0` before incrementing.
/// Every other operation is a plain whole-value read or replacement.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// The error type for this implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Returns `false` if the backend declined the write.
    async fn set(&self, key: &str, value: &str) -> Result<bool, Self::Error>;

    /// Read the value under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Remove `key`. Returns `true` if a value was removed.
    async fn delete(&self, key: &str) -> Result<bool, Self::Error>;

    /// Check whether `key` holds a value.
    async fn exists(&self, key: &str) -> Result<bool, Self::Error>;

    /// Atomically increment the integer under `key` and return the new value.
    async fn increment(&self, key: &str) -> Result<i64, Self::Error>;
}

#[async_trait]
impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    type Error = S::Error;

    async fn set(&self, key: &str, value: &str) -> Result<bool, Self::Error> {
        (**self).set(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, Self::Error> {
        (**self).delete(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        (**self).exists(key).await
    }

    async fn increment(&self, key: &str) -> Result<i64, Self::Error> {
        (**self).increment(key).await
    }
}
