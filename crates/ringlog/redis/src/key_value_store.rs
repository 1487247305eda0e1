//! # Redis KeyValueStore Implementation
//!
//! | port        | command  |
//! |-------------|----------|
//! | `set`       | `SET`    |
//! | `get`       | `GET`    |
//! | `delete`    | `DEL`    |
//! | `exists`    | `EXISTS` |
//! | `increment` | `INCRBY key 1` |
//!
//! Commands go through a [`ConnectionManager`], which reconnects on its own
//! after the server drops the connection.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use ringlog_core::port::KeyValueStore;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Redis KeyValueStore implementation.
#[derive(Clone)]
pub struct RedisKeyValueStore {
    connection: ConnectionManager,
}

impl fmt::Debug for RedisKeyValueStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisKeyValueStore").finish_non_exhaustive()
    }
}

impl RedisKeyValueStore {
    /// Connect to the server at `url`, e.g. `redis://127.0.0.1:6379/0`.
    pub async fn new(url: &str) -> Result<Self, RedisKeyValueStoreError> {
        let client = Client::open(url)?;
        Self::from_client(client).await
    }

    /// Connect through an already configured client.
    pub async fn from_client(client: Client) -> Result<Self, RedisKeyValueStoreError> {
        let connection = client.get_connection_manager().await?;
        debug!("Redis key-value store ready");
        Ok(Self::from_connection_manager(connection))
    }

    /// Reuse a connection manager the application already holds.
    pub fn from_connection_manager(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    type Error = RedisKeyValueStoreError;

    async fn set(&self, key: &str, value: &str) -> Result<bool, Self::Error> {
        let mut conn = self.connection.clone();
        let reply: Option<String> = conn.set(key, value).await?;
        Ok(reply.is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value.filter(|v| !v.is_empty()))
    }

    async fn delete(&self, key: &str) -> Result<bool, Self::Error> {
        let mut conn = self.connection.clone();
        let removed: i64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        let mut conn = self.connection.clone();
        let found: bool = conn.exists(key).await?;
        Ok(found)
    }

    async fn increment(&self, key: &str) -> Result<i64, Self::Error> {
        let mut conn = self.connection.clone();
        let value: i64 = conn.incr(key, 1_i64).await?;
        Ok(value)
    }
}

/// Errors from [`RedisKeyValueStore`] operations.
#[derive(Debug, Error)]
pub enum RedisKeyValueStoreError {
    /// Connection or command error, including `INCRBY` on a non-integer.
    #[error("Redis error: {0}")]
    Backend(#[from] redis::RedisError),
}
