//! # Ring Buffer Log Store
//!
//! [`RingBufferLog`] maps an unbounded stream of log entries onto a fixed
//! number of slots in a [`KeyValueStore`] and reconstructs chronological
//! order on demand.
//!
//! ## Write protocol
//!
//! 1. `increment({prefix}:position)` yields the entry's sequence number `c`.
//! 2. The entry is encoded and stored at `{prefix}:entry:{c mod N}`,
//!    replacing whatever the slot held.
//!
//! The atomic increment is the only serialization point between writers, in
//! this process or any other sharing the store. The increment and the slot
//! write are not coupled: a reader can observe a slot near the write frontier
//! that is stale or briefly missing, but never a torn entry.
//!
//! ## Read protocol
//!
//! With `p` the persisted counter (`-1` when absent or unparsable), slots
//! `(p + 1 + i) mod N` for `i` in `0..N` are visited in order. That walk
//! starts at the oldest retained entry and ends on the most recent one.
//! Empty slots are skipped.
//!
//! ## Failure policy
//!
//! [`append`](RingBufferLog::append) and [`read_all`](RingBufferLog::read_all)
//! are fail-open: errors go to the diagnostic sink and to `tracing`, never to
//! the caller. A failed append drops its entry but still consumes its
//! sequence number; a failed read returns an empty list. The `try_` variants
//! run the same protocol and return the error instead.
//! [`clear`](RingBufferLog::clear) and [`count`](RingBufferLog::count)
//! surface store errors directly.

pub mod keys;

pub use keys::{KeyLayout, EMPTY_POSITION, POSITION_RESET};

use crate::codec::{EntryCodec, JsonCodec};
use crate::config::{validate_capacity, validate_key_prefix, ConfigError, RingBufferConfig};
use crate::diagnostics::{DiagnosticNotice, DiagnosticSink, Operation};
use crate::entry::LogEntry;
use crate::error::{Result, RingBufferError};
use crate::port::KeyValueStore;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Fixed-capacity circular log persisted in a key-value store.
pub struct RingBufferLog<S> {
    store: Arc<S>,
    layout: KeyLayout,
    codec: Arc<dyn EntryCodec>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
    /// Keeps this process's own multi-key sequences from interleaving.
    lock: Mutex<()>,
}

impl<S> fmt::Debug for RingBufferLog<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBufferLog")
            .field("key_prefix", &self.layout.prefix())
            .field("capacity", &self.layout.capacity())
            .field("codec", &self.codec.codec_id())
            .field("diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}

impl<S: KeyValueStore> RingBufferLog<S> {
    /// Create a buffer with the JSON codec and no diagnostic sink.
    pub fn new(store: Arc<S>, key_prefix: impl Into<String>, capacity: usize) -> Result<Self> {
        Self::builder()
            .store(store)
            .key_prefix(key_prefix)
            .capacity(capacity)
            .build()
    }

    /// Create a buffer from a validated configuration.
    pub fn from_config(store: Arc<S>, config: &RingBufferConfig) -> Result<Self> {
        Self::new(store, config.key_prefix.clone(), config.capacity)
    }

    /// Create a builder for custom configuration.
    pub fn builder() -> RingBufferLogBuilder<S> {
        RingBufferLogBuilder::new()
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    /// Key namespace.
    pub fn key_prefix(&self) -> &str {
        self.layout.prefix()
    }

    /// Key layout for this buffer.
    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    /// Append an entry. Never fails; see the module docs.
    pub async fn append(&self, entry: &LogEntry) {
        if let Err(e) = self.try_append(entry).await {
            self.report(Operation::Append, &e);
        }
    }

    /// Append an entry and return its sequence number.
    pub async fn try_append(&self, entry: &LogEntry) -> Result<i64> {
        let _guard = self.lock.lock().await;

        let position_key = self.layout.position_key();
        let counter = self
            .store
            .increment(position_key)
            .await
            .map_err(|e| RingBufferError::storage("increment", position_key, e))?;

        let slot = self.layout.slot_for(counter);
        let slot_key = self.layout.slot_key(slot);
        let encoded = self.codec.encode(entry).map_err(RingBufferError::Encode)?;

        let stored = self
            .store
            .set(&slot_key, &encoded)
            .await
            .map_err(|e| RingBufferError::storage("set", slot_key.as_str(), e))?;
        if !stored {
            return Err(RingBufferError::Rejected { key: slot_key });
        }

        debug!(
            key_prefix = self.layout.prefix(),
            counter,
            slot,
            "Appended entry to ring buffer"
        );
        Ok(counter)
    }

    /// Read every retained entry, oldest first. Returns an empty list on
    /// failure; see the module docs.
    pub async fn read_all(&self) -> Vec<LogEntry> {
        match self.try_read_all().await {
            Ok(entries) => entries,
            Err(e) => {
                self.report(Operation::ReadAll, &e);
                Vec::new()
            }
        }
    }

    /// Read every retained entry, oldest first.
    pub async fn try_read_all(&self) -> Result<Vec<LogEntry>> {
        let _guard = self.lock.lock().await;

        let position = self.read_position().await?;
        let mut entries = Vec::with_capacity(self.layout.capacity());

        for slot in self.layout.read_order(position) {
            let slot_key = self.layout.slot_key(slot);
            let value = self
                .store
                .get(&slot_key)
                .await
                .map_err(|e| RingBufferError::storage("get", slot_key.as_str(), e))?;

            match value {
                Some(value) if !value.is_empty() => {
                    let entry = self
                        .codec
                        .decode(&value)
                        .map_err(|source| RingBufferError::Decode {
                            key: slot_key,
                            source,
                        })?;
                    entries.push(entry);
                }
                _ => {}
            }
        }

        Ok(entries)
    }

    /// Delete every slot and reset the counter to `-1`.
    ///
    /// Idempotent. The next append after a clear lands on counter 0, slot 0.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().await;

        for slot_key in self.layout.slot_keys() {
            self.store
                .delete(&slot_key)
                .await
                .map_err(|e| RingBufferError::storage("delete", slot_key.as_str(), e))?;
        }

        let position_key = self.layout.position_key();
        let reset = self
            .store
            .set(position_key, POSITION_RESET)
            .await
            .map_err(|e| RingBufferError::storage("set", position_key, e))?;
        if !reset {
            return Err(RingBufferError::Rejected {
                key: position_key.to_string(),
            });
        }

        debug!(key_prefix = self.layout.prefix(), "Cleared ring buffer");
        Ok(())
    }

    /// Number of slots currently holding a value.
    ///
    /// Determined by existence checks alone. Exact only while no other
    /// writer is wrapping around the buffer.
    pub async fn count(&self) -> Result<usize> {
        let mut count = 0;
        for slot_key in self.layout.slot_keys() {
            let exists = self
                .store
                .exists(&slot_key)
                .await
                .map_err(|e| RingBufferError::storage("exists", slot_key.as_str(), e))?;
            if exists {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Persisted counter value, `-1` when nothing was written or the stored
    /// value is not an integer.
    pub async fn position(&self) -> Result<i64> {
        self.read_position().await
    }

    async fn read_position(&self) -> Result<i64> {
        let position_key = self.layout.position_key();
        let raw = self
            .store
            .get(position_key)
            .await
            .map_err(|e| RingBufferError::storage("get", position_key, e))?;

        Ok(raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(EMPTY_POSITION))
    }

    fn report(&self, operation: Operation, error: &RingBufferError) {
        warn!(
            key_prefix = self.layout.prefix(),
            %operation,
            error = %error,
            "Ring buffer operation failed"
        );

        if let Some(sink) = &self.diagnostics {
            sink.report(&DiagnosticNotice {
                operation,
                key_prefix: self.layout.prefix().to_string(),
                error: error.to_string(),
            });
        }
    }
}

/// Builder for [`RingBufferLog`].
pub struct RingBufferLogBuilder<S> {
    store: Option<Arc<S>>,
    key_prefix: Option<String>,
    capacity: Option<usize>,
    codec: Arc<dyn EntryCodec>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl<S> Default for RingBufferLogBuilder<S> {
    fn default() -> Self {
        Self {
            store: None,
            key_prefix: None,
            capacity: None,
            codec: Arc::new(JsonCodec::new()),
            diagnostics: None,
        }
    }
}

impl<S: KeyValueStore> RingBufferLogBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backing store.
    pub fn store(mut self, store: Arc<S>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the key namespace.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Set the number of slots.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Replace the entry codec.
    pub fn codec(mut self, codec: impl EntryCodec) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Attach a diagnostic sink.
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Build the [`RingBufferLog`].
    pub fn build(self) -> Result<RingBufferLog<S>> {
        let store = self.store.ok_or_else(|| ConfigError::MissingRequired {
            var: "store".to_string(),
        })?;
        let key_prefix = self.key_prefix.ok_or(ConfigError::MissingKeyPrefix)?;
        validate_key_prefix(&key_prefix)?;
        let capacity = self.capacity.ok_or_else(|| ConfigError::MissingRequired {
            var: "capacity".to_string(),
        })?;
        let capacity = validate_capacity(i64::try_from(capacity).unwrap_or(i64::MAX))?;

        Ok(RingBufferLog {
            store,
            layout: KeyLayout::new(key_prefix, capacity),
            codec: self.codec,
            diagnostics: self.diagnostics,
            lock: Mutex::new(()),
        })
    }
}
