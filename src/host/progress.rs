use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::pipeline::BatchSummary;

use super::ProgressSink;

/// Cooperative cancellation flag shared between the batch and its caller.
///
/// Cloning yields another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the batch stop before its next result.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress sink that reports through `tracing` and polls a [`CancelToken`].
#[derive(Debug, Default)]
pub struct LoggingProgress {
    token: CancelToken,
}

impl LoggingProgress {
    #[must_use]
    pub fn new(token: CancelToken) -> Self {
        Self { token }
    }
}

impl ProgressSink for LoggingProgress {
    fn begin(&mut self, total: usize) {
        tracing::info!(total, "Processing clash results");
    }

    fn update(&mut self, current: usize, total: usize, label: &str) {
        tracing::info!(current, total, label, "Processing clash result");
    }

    fn cancel_requested(&mut self) -> bool {
        self.token.is_cancelled()
    }

    fn end(&mut self, summary: &BatchSummary) {
        tracing::info!(
            success = summary.success,
            skipped = summary.skipped,
            error = summary.error,
            total = summary.total,
            cancelled = summary.cancelled,
            "Finished clash batch"
        );
    }
}

/// Progress sink that ignores every report and never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin(&mut self, _total: usize) {}

    fn update(&mut self, _current: usize, _total: usize, _label: &str) {}

    fn cancel_requested(&mut self) -> bool {
        false
    }

    fn end(&mut self, _summary: &BatchSummary) {}
}
