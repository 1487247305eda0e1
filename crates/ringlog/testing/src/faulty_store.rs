//! Fault-injecting KeyValueStore wrapper.
//!
//! [`FaultyKeyValueStore`] forwards to an inner store, records every call,
//! and fails or rejects the operations it has been told to.

use async_trait::async_trait;
use parking_lot::Mutex;
use ringlog_core::port::KeyValueStore;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// A store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Set,
    Get,
    Delete,
    Exists,
    Increment,
}

impl StoreOp {
    pub const ALL: [StoreOp; 5] = [
        StoreOp::Set,
        StoreOp::Get,
        StoreOp::Delete,
        StoreOp::Exists,
        StoreOp::Increment,
    ];
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreOp::Set => "set",
            StoreOp::Get => "get",
            StoreOp::Delete => "delete",
            StoreOp::Exists => "exists",
            StoreOp::Increment => "increment",
        };
        f.write_str(name)
    }
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub key: String,
    pub value: Option<String>,
}

/// Errors from [`FaultyKeyValueStore`].
#[derive(Debug, Error)]
pub enum FaultyStoreError {
    /// Failure injected for this operation.
    #[error("injected {0} failure")]
    Injected(StoreOp),

    /// The wrapped store failed.
    #[error("inner store failed: {0}")]
    Inner(String),
}

/// Store wrapper with injectable faults.
#[derive(Debug)]
pub struct FaultyKeyValueStore<S> {
    inner: S,
    failing: Mutex<HashSet<StoreOp>>,
    reject_writes: Mutex<bool>,
    calls: Mutex<Vec<StoreCall>>,
}

impl<S: KeyValueStore> FaultyKeyValueStore<S> {
    /// Wrap `inner` with no faults enabled.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            failing: Mutex::new(HashSet::new()),
            reject_writes: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `op` fail until [`heal`](Self::heal) is called.
    pub fn fail(&self, op: StoreOp) {
        self.failing.lock().insert(op);
    }

    /// Make every operation fail.
    pub fn fail_all(&self) {
        self.failing.lock().extend(StoreOp::ALL);
    }

    /// Have `set` report `false` without writing.
    pub fn reject_writes(&self, reject: bool) {
        *self.reject_writes.lock() = reject;
    }

    /// Clear every injected fault.
    pub fn heal(&self) {
        self.failing.lock().clear();
        *self.reject_writes.lock() = false;
    }

    /// Every call made so far, failed ones included.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// Keys passed to `op`, in call order.
    pub fn keys_for(&self, op: StoreOp) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.op == op)
            .map(|c| c.key.clone())
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn enter(&self, op: StoreOp, key: &str, value: Option<&str>) -> Result<(), FaultyStoreError> {
        self.calls.lock().push(StoreCall {
            op,
            key: key.to_string(),
            value: value.map(str::to_string),
        });
        if self.failing.lock().contains(&op) {
            return Err(FaultyStoreError::Injected(op));
        }
        Ok(())
    }
}

fn inner_error(e: impl std::error::Error) -> FaultyStoreError {
    FaultyStoreError::Inner(e.to_string())
}

#[async_trait]
impl<S: KeyValueStore> KeyValueStore for FaultyKeyValueStore<S> {
    type Error = FaultyStoreError;

    async fn set(&self, key: &str, value: &str) -> Result<bool, Self::Error> {
        self.enter(StoreOp::Set, key, Some(value))?;
        if *self.reject_writes.lock() {
            return Ok(false);
        }
        self.inner.set(key, value).await.map_err(inner_error)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.enter(StoreOp::Get, key, None)?;
        self.inner.get(key).await.map_err(inner_error)
    }

    async fn delete(&self, key: &str) -> Result<bool, Self::Error> {
        self.enter(StoreOp::Delete, key, None)?;
        self.inner.delete(key).await.map_err(inner_error)
    }

    async fn exists(&self, key: &str) -> Result<bool, Self::Error> {
        self.enter(StoreOp::Exists, key, None)?;
        self.inner.exists(key).await.map_err(inner_error)
    }

    async fn increment(&self, key: &str) -> Result<i64, Self::Error> {
        self.enter(StoreOp::Increment, key, None)?;
        self.inner.increment(key).await.map_err(inner_error)
    }
}
