//! Diagnostic sink that keeps every notice for later assertions.

use parking_lot::Mutex;
use ringlog_core::diagnostics::{DiagnosticNotice, DiagnosticSink, Operation};
use std::sync::Arc;

/// Records notices in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnosticSink {
    notices: Arc<Mutex<Vec<DiagnosticNotice>>>,
}

impl RecordingDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every notice received so far.
    pub fn notices(&self) -> Vec<DiagnosticNotice> {
        self.notices.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.notices.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.lock().is_empty()
    }

    /// Number of notices for `operation`.
    pub fn count_for(&self, operation: Operation) -> usize {
        self.notices
            .lock()
            .iter()
            .filter(|n| n.operation == operation)
            .count()
    }
}

impl DiagnosticSink for RecordingDiagnosticSink {
    fn report(&self, notice: &DiagnosticNotice) {
        self.notices.lock().push(notice.clone());
    }
}
