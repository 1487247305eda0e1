//! # SQLite KeyValueStore Implementation
//!
//! Keys and values live in a single `ringlog_kv` table. Every operation is a
//! single SQL statement, so `increment` is atomic across every connection
//! and process that opens the same database file.

use async_trait::async_trait;
use ringlog_core::port::KeyValueStore;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Configuration for [`SqliteKeyValueStore`].
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStoreConfig {
    /// Maximum pooled connections for file-backed databases.
    pub max_connections: u32,
}

impl Default for SqliteKeyValueStoreConfig {
    fn default() -> Self {
        Self { max_connections: 5 }
    }
}

/// SQLite KeyValueStore implementation.
///
/// # Examples
///
/// ```ignore
/// use ringlog_sqlite::SqliteKeyValueStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteKeyValueStore::new("/tmp/ringlog.db").await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    pool: Arc<SqlitePool>,
}

impl SqliteKeyValueStore {
    /// Open (creating if needed) a file-backed store.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, SqliteKeyValueStoreError> {
        Self::with_config(path, SqliteKeyValueStoreConfig::default()).await
    }

    /// Open a file-backed store with custom configuration.
    pub async fn with_config(
        path: impl AsRef<Path>,
        config: SqliteKeyValueStoreConfig,
    ) -> Result<Self, SqliteKeyValueStoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(SqliteKeyValueStoreError::Backend)?;

        Self::init_pool(pool).await
    }

    /// Create an in-memory store.
    ///
    /// Every pooled connection to `sqlite::memory:` would get its own
    /// database, so the pool is limited to one connection.
    pub async fn in_memory() -> Result<Self, SqliteKeyValueStoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(SqliteKeyValueStoreError::Backend)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(SqliteKeyValueStoreError::Backend)?;

        Self::init_pool(pool).await
    }

    async fn init_pool(pool: SqlitePool) -> Result<Self, SqliteKeyValueStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ringlog_kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(SqliteKeyValueStoreError::Backend)?;

        debug!("SQLite key-value store ready");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    type Error = SqliteKeyValueStoreError;

    async fn set(&self, key: &str, value: &str) -> Result<bool, Self::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO ringlog_kv (key, value) VALUES (?, ?)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&*self.pool)
        .await
        .map_err(SqliteKeyValueStoreError::Backend)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        sqlx::query_scalar::<_, String>("SELECT value FROM ringlog_kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&*self.pool)
            .await
            .map_err(SqliteKeyValueStoreError::Backend)
    }

    async fn delete(&self, key: &str) -> Result<bool, Self::Error> {
        let result = sqlx::query("DELETE FROM ringlog_kv WHERE key = ?")
            .bind(key)
            .execute(&*self.pool)
            .await
            .map_err(SqliteKeyValueStoreError::Backend)?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS (SELECT 1 FROM ringlog_kv WHERE key = ?)",
        )
        .bind(key)
        .fetch_one(&*self.pool)
        .await
        .map_err(SqliteKeyValueStoreError::Backend)?;

        Ok(found != 0)
    }

    async fn increment(&self, key: &str) -> Result<i64, Self::Error> {
        // The WHERE clause leaves non-integer values and i64::MAX untouched,
        // which makes RETURNING yield no row.
        let returned = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO ringlog_kv (key, value) VALUES (?, '1')
            ON CONFLICT (key) DO UPDATE
                SET value = CAST(CAST(value AS INTEGER) + 1 AS TEXT)
                WHERE CAST(CAST(value AS INTEGER) AS TEXT) = trim(value)
                  AND CAST(value AS INTEGER) < 9223372036854775807
            RETURNING value
            "#,
        )
        .bind(key)
        .fetch_optional(&*self.pool)
        .await
        .map_err(SqliteKeyValueStoreError::Backend)?;

        let Some(value) = returned else {
            let current = self.get(key).await?;
            return Err(match current.and_then(|v| v.trim().parse::<i64>().ok()) {
                Some(_) => SqliteKeyValueStoreError::Overflow(key.to_string()),
                None => SqliteKeyValueStoreError::NotAnInteger(key.to_string()),
            });
        };

        value
            .parse::<i64>()
            .map_err(|_| SqliteKeyValueStoreError::NotAnInteger(key.to_string()))
    }
}

/// Errors from [`SqliteKeyValueStore`] operations.
#[derive(Debug, Error)]
pub enum SqliteKeyValueStoreError {
    /// Database error.
    #[error("SQLite error: {0}")]
    Backend(#[from] sqlx::Error),

    /// The value under the key is not an integer.
    #[error("Value at {0} is not an integer")]
    NotAnInteger(String),

    /// Incrementing would overflow a 64-bit integer.
    #[error("Increment would overflow at {0}")]
    Overflow(String),
}
