//! # ringlog-core
//!
//! Fixed-capacity, persistent circular log buffer built on a generic
//! key-value store.
//!
//! ## Architecture
//!
//! This crate defines the store port and the ring buffer protocol. It has no
//! dependency on any concrete storage engine; backends live in adapter crates
//! (`ringlog-local`, `ringlog-sqlite`).
//!
//! ## Modules
//!
//! - [`entry`]: [`LogEntry`], [`LogLevel`], [`EventId`]
//! - [`codec`]: [`EntryCodec`] trait and [`JsonCodec`]
//! - [`port`]: [`KeyValueStore`], the capability backends implement
//! - [`ring_buffer`]: [`RingBufferLog`], slot indexing and ordered reads
//! - [`logger`]: [`RingBufferLogger`], the log-call front-end
//! - [`diagnostics`]: [`DiagnosticSink`] for the buffer's own faults
//! - [`config`]: [`RingBufferConfig`] and environment loading
//! - [`telemetry`]: `tracing` subscriber setup
//! - [`error`]: [`RingBufferError`]
//!
//! ## Usage
//!
//! ```ignore
//! use ringlog_core::{LogEntry, LogLevel, RingBufferLog};
//! use std::sync::Arc;
//!
//! let log = RingBufferLog::new(Arc::new(store), "checkout-api", 500)?;
//! log.append(&LogEntry::new(LogLevel::Information, 1, "order placed")).await;
//!
//! for entry in log.read_all().await {
//!     println!("{} {} {}", entry.timestamp, entry.level, entry.message);
//! }
//! ```

pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod entry;
pub mod error;
pub mod logger;
pub mod port;
pub mod ring_buffer;
pub mod telemetry;

pub use codec::{CodecError, EntryCodec, JsonCodec};
pub use config::{ConfigError, ConfigLoader, RingBufferConfig};
pub use diagnostics::{DiagnosticNotice, DiagnosticSink, Operation, TracingDiagnosticSink};
pub use entry::{EventId, LogEntry, LogLevel};
pub use error::{BoxError, Result, RingBufferError};
pub use logger::{render_error_chain, RingBufferLogger};
pub use port::KeyValueStore;
pub use ring_buffer::{KeyLayout, RingBufferLog, RingBufferLogBuilder};
pub use telemetry::{init_telemetry, TelemetryConfig, TelemetryGuard};
