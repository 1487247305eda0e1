//! Entry codec traits and implementations.
//!
//! Slots hold text, so codecs map a [`LogEntry`] to and from a `String`.
//! The ring buffer only ever talks to the [`EntryCodec`] trait:
//!
//! ```ignore
//! let encoded = codec.encode(&entry)?;
//! let decoded = codec.decode(&encoded)?;
//! ```

use crate::entry::{EventId, LogEntry, LogLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error type for codec operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl CodecError {
    /// Create a parse error.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Trait for encoding and decoding log entries.
pub trait EntryCodec: Send + Sync + 'static {
    /// Encode an entry to its stored text form.
    fn encode(&self, entry: &LogEntry) -> Result<String, CodecError>;

    /// Decode an entry from its stored text form.
    fn decode(&self, data: &str) -> Result<LogEntry, CodecError>;

    /// Return a unique identifier for this codec.
    fn codec_id(&self) -> &'static str;
}

// ============================================================================
// JSON Codec
// ============================================================================

/// JSON entry codec.
///
/// Produces one object per entry:
///
/// ```json
/// {"Timestamp":"2024-05-01T10:00:00.250+00:00","LogLevel":2,"EventId":1,"Message":"started","Exception":null}
/// ```
///
/// The level is stored as its numeric value and the timestamp as RFC 3339,
/// which is the layout other writers sharing a buffer already use.
#[derive(Debug, Default, Clone)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec.
    pub fn new() -> Self {
        Self
    }
}

impl EntryCodec for JsonCodec {
    fn encode(&self, entry: &LogEntry) -> Result<String, CodecError> {
        let wrapper = EntryWrapper::from(entry);
        serde_json::to_string(&wrapper).map_err(CodecError::Json)
    }

    fn decode(&self, data: &str) -> Result<LogEntry, CodecError> {
        let wrapper: EntryWrapper = serde_json::from_str(data).map_err(CodecError::Json)?;
        wrapper.into_entry()
    }

    fn codec_id(&self) -> &'static str {
        "json"
    }
}

/// Internal wrapper for JSON serialization.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EntryWrapper {
    timestamp: String,
    log_level: u8,
    event_id: i32,
    message: String,
    #[serde(default)]
    exception: Option<String>,
}

impl EntryWrapper {
    fn from(entry: &LogEntry) -> Self {
        Self {
            timestamp: entry.timestamp.to_rfc3339(),
            log_level: entry.level as u8,
            event_id: entry.event_id.0,
            message: entry.message.clone(),
            exception: entry.exception.clone(),
        }
    }

    fn into_entry(self) -> Result<LogEntry, CodecError> {
        let level = LogLevel::from_u8(self.log_level).ok_or_else(|| {
            CodecError::parse_error(format!("Unknown log level: {}", self.log_level))
        })?;

        let timestamp = DateTime::parse_from_rfc3339(&self.timestamp)
            .map_err(|e| {
                CodecError::parse_error(format!("Invalid timestamp {}: {}", self.timestamp, e))
            })?
            .with_timezone(&Utc);

        Ok(LogEntry {
            timestamp,
            level,
            event_id: EventId(self.event_id),
            message: self.message,
            exception: self.exception,
        })
    }
}
