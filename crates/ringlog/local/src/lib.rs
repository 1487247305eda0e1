//! # ringlog-local
//!
//! Process-local backend for ringlog.
//!
//! [`InMemoryKeyValueStore`] keeps every key in a map behind an async mutex.
//! It gives a ring buffer the same semantics a networked store would, which
//! makes it the backend of choice for tests, CLIs and single-process
//! services that only need the buffer while they run.

pub mod key_value_store;

pub use key_value_store::{InMemoryKeyValueStore, InMemoryKeyValueStoreError};
