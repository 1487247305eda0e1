//! # ringlog-redis
//!
//! Redis backend for ringlog.
//!
//! [`RedisKeyValueStore`] maps the store port onto plain string commands, so
//! every process pointed at the same server shares one buffer and the
//! server's `INCRBY` orders their appends.
//!
//! ## Usage
//!
//! ```ignore
//! use ringlog_core::RingBufferLog;
//! use ringlog_redis::RedisKeyValueStore;
//! use std::sync::Arc;
//!
//! let store = RedisKeyValueStore::new("redis://127.0.0.1/").await?;
//! let log = RingBufferLog::new(Arc::new(store), "my-app", 1000)?;
//! ```

pub mod key_value_store;

pub use key_value_store::{RedisKeyValueStore, RedisKeyValueStoreError};
