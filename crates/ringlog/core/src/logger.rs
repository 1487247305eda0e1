//! Log ingestion front-end.
//!
//! [`RingBufferLogger`] turns a raw log call (level, event id, state,
//! formatter, optional error) into a [`LogEntry`] and appends it to a
//! [`RingBufferLog`]. Store and codec failures are swallowed the same way
//! the buffer's append swallows them. A panic raised by the caller's
//! formatter is not caught and unwinds through [`RingBufferLogger::log`].

use crate::config::RingBufferConfig;
use crate::entry::{EventId, LogEntry, LogLevel};
use crate::error::Result;
use crate::port::KeyValueStore;
use crate::ring_buffer::RingBufferLog;
use chrono::Utc;
use std::error::Error;
use std::sync::Arc;

/// Logger that records into a ring buffer.
#[derive(Debug)]
pub struct RingBufferLogger<S> {
    buffer: Arc<RingBufferLog<S>>,
    min_level: LogLevel,
}

impl<S> Clone for RingBufferLogger<S> {
    fn clone(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
            min_level: self.min_level,
        }
    }
}

impl<S: KeyValueStore> RingBufferLogger<S> {
    /// Create a logger that records every level.
    pub fn new(buffer: Arc<RingBufferLog<S>>) -> Self {
        Self {
            buffer,
            min_level: LogLevel::Trace,
        }
    }

    /// Create the buffer and logger described by `config`.
    pub fn from_config(store: Arc<S>, config: &RingBufferConfig) -> Result<Self> {
        let buffer = RingBufferLog::from_config(store, config)?;
        Ok(Self::new(Arc::new(buffer)).with_min_level(config.min_level))
    }

    /// Drop entries below `level`.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &Arc<RingBufferLog<S>> {
        &self.buffer
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Record a log call.
    ///
    /// Disabled levels skip formatting entirely. The error, if any, is stored
    /// with its full `source()` chain.
    ///
    /// # Panics
    ///
    /// Propagates a panic from `formatter`.
    pub async fn log<T, F>(
        &self,
        level: LogLevel,
        event_id: impl Into<EventId>,
        state: T,
        error: Option<&(dyn Error + 'static)>,
        formatter: F,
    ) where
        F: FnOnce(&T, Option<&(dyn Error + 'static)>) -> String,
    {
        if let Some(entry) = self.resolve(level, event_id.into(), &state, error, formatter) {
            self.buffer.append(&entry).await;
        }
    }

    /// Build the entry for a log call, or `None` when `level` is disabled.
    pub fn resolve<T, F>(
        &self,
        level: LogLevel,
        event_id: EventId,
        state: &T,
        error: Option<&(dyn Error + 'static)>,
        formatter: F,
    ) -> Option<LogEntry>
    where
        F: FnOnce(&T, Option<&(dyn Error + 'static)>) -> String,
    {
        self.is_enabled(level).then(|| LogEntry {
            timestamp: Utc::now(),
            level,
            event_id,
            message: formatter(state, error),
            exception: error.map(render_error_chain),
        })
    }

    /// Record an already formatted message.
    pub async fn log_message(
        &self,
        level: LogLevel,
        event_id: impl Into<EventId>,
        message: impl Into<String>,
    ) {
        if self.is_enabled(level) {
            let entry = LogEntry::new(level, event_id, message);
            self.buffer.append(&entry).await;
        }
    }

    /// Retained entries, oldest first.
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.buffer.read_all().await
    }
}

/// Render an error and each of its sources, outermost first, one per line.
pub fn render_error_chain(error: &(dyn Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str("\ncaused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
