//! Error types for ring buffer operations.

use crate::codec::CodecError;
use crate::config::ConfigError;
use thiserror::Error;

/// Boxed backend error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from ring buffer operations.
#[derive(Debug, Error)]
pub enum RingBufferError {
    /// Invalid construction parameters.
    #[error("Invalid ring buffer configuration: {0}")]
    Config(#[from] ConfigError),

    /// The backing store failed.
    #[error("Store {operation} failed for key {key}: {source}")]
    Storage {
        operation: &'static str,
        key: String,
        #[source]
        source: BoxError,
    },

    /// The backing store declined a write.
    #[error("Store rejected write to key {key}")]
    Rejected { key: String },

    /// An entry could not be encoded.
    #[error("Failed to encode entry: {0}")]
    Encode(#[source] CodecError),

    /// A stored slot could not be decoded.
    #[error("Failed to decode entry at key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: CodecError,
    },
}

impl RingBufferError {
    /// Wrap a backend error.
    pub fn storage<E>(operation: &'static str, key: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            operation,
            key: key.into(),
            source: Box::new(source),
        }
    }

    /// Check whether this is a construction-time error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type for ring buffer operations.
pub type Result<T> = std::result::Result<T, RingBufferError>;
