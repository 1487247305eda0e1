//! Configuration for ring buffer logs.
//!
//! Configuration is an immutable value built once (from code or from the
//! environment) and handed to [`RingBufferLog::from_config`].
//!
//! # Environment Variables
//!
//! - `RINGLOG_KEY_PREFIX`: key namespace (default: "ringlog")
//! - `RINGLOG_CAPACITY`: number of slots (default: 1000)
//! - `RINGLOG_MIN_LEVEL`: lowest level the logger records (default: "trace")
//!
//! [`RingBufferLog::from_config`]: crate::ring_buffer::RingBufferLog::from_config

pub mod error;
pub mod loader;

pub use error::{ConfigError, Result};
pub use loader::ConfigLoader;

use crate::entry::LogLevel;

/// Default key namespace.
pub const DEFAULT_KEY_PREFIX: &str = "ringlog";

/// Default number of slots.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Configuration for a ring buffer log and its logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingBufferConfig {
    /// Namespace for every key this buffer touches.
    pub key_prefix: String,
    /// Number of slots.
    pub capacity: usize,
    /// Entries below this level are dropped by the logger.
    pub min_level: LogLevel,
}

impl Default for RingBufferConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            capacity: DEFAULT_CAPACITY,
            min_level: LogLevel::Trace,
        }
    }
}

impl RingBufferConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the minimum level
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Check that the configuration describes a usable buffer.
    pub fn validate(&self) -> Result<()> {
        validate_key_prefix(&self.key_prefix)?;
        validate_capacity(self.capacity as i64)?;
        Ok(())
    }
}

/// Validate a key prefix.
pub fn validate_key_prefix(prefix: &str) -> Result<()> {
    if prefix.trim().is_empty() {
        return Err(ConfigError::MissingKeyPrefix);
    }
    Ok(())
}

/// Validate a capacity given as a signed value, so that negative input from
/// text sources is reported as such.
pub fn validate_capacity(capacity: i64) -> Result<usize> {
    if capacity <= 0 {
        return Err(ConfigError::InvalidCapacity(capacity));
    }
    Ok(capacity as usize)
}
