//! # ringlog-sqlite
//!
//! SQLite backend for ringlog.
//!
//! [`SqliteKeyValueStore`] persists the ring buffer in a database file, so
//! the buffer survives restarts and can be shared by every process that opens
//! the same file.
//!
//! ## Usage
//!
//! ```ignore
//! use ringlog_core::RingBufferLog;
//! use ringlog_sqlite::SqliteKeyValueStore;
//! use std::sync::Arc;
//!
//! let store = SqliteKeyValueStore::new("/var/lib/my-app/ringlog.db").await?;
//! let log = RingBufferLog::new(Arc::new(store), "my-app", 1000)?;
//! ```

pub mod key_value_store;

pub use key_value_store::{
    SqliteKeyValueStore, SqliteKeyValueStoreConfig, SqliteKeyValueStoreError,
};
