//! Diagnostic sink for faults inside the ring buffer itself.
//!
//! Fail-open operations never return their errors; instead they hand one
//! [`DiagnosticNotice`] to the configured [`DiagnosticSink`]. Sinks are
//! advisory and must not block.

use std::fmt;

/// Fail-open operation that produced a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Append,
    ReadAll,
}

impl Operation {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Append => "append",
            Operation::ReadAll => "read_all",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single internal fault report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticNotice {
    /// The failed operation.
    pub operation: Operation,
    /// Namespace of the buffer that failed.
    pub key_prefix: String,
    /// Rendered error.
    pub error: String,
}

impl fmt::Display for DiagnosticNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ring buffer {} failed for {}: {}",
            self.operation, self.key_prefix, self.error
        )
    }
}

/// Receiver of diagnostic notices.
pub trait DiagnosticSink: Send + Sync {
    /// Record one notice.
    fn report(&self, notice: &DiagnosticNotice);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&DiagnosticNotice) + Send + Sync,
{
    fn report(&self, notice: &DiagnosticNotice) {
        self(notice)
    }
}

/// Sink that forwards notices to `tracing` at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnosticSink;

impl TracingDiagnosticSink {
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for TracingDiagnosticSink {
    fn report(&self, notice: &DiagnosticNotice) {
        tracing::error!(
            target: "ringlog::diagnostics",
            operation = %notice.operation,
            key_prefix = %notice.key_prefix,
            error = %notice.error,
            "Ring buffer operation failed"
        );
    }
}
