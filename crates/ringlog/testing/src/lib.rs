//! # ringlog-testing
//!
//! Test doubles for ringlog: a fault-injecting [`FaultyKeyValueStore`] and a
//! [`RecordingDiagnosticSink`]. The scenario suites for the ring buffer live
//! in this crate's `tests/` directory.

pub mod faulty_store;
pub mod recording_sink;

pub use faulty_store::{FaultyKeyValueStore, FaultyStoreError, StoreCall, StoreOp};
pub use recording_sink::RecordingDiagnosticSink;
