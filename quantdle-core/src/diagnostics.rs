use crate::Warning;
use crate::range::DateRange;

/// Explicit sink for recoverable warnings, threaded through the pipeline.
///
/// Every stage that can degrade a result takes `&mut Diagnostics` and records
/// what happened here instead of failing. Concurrent fetch tasks each own a
/// local sink that the orchestrator merges once the task completes, so no
/// locking is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Record a warning.
    pub fn warn(&mut self, warning: Warning) {
        #[cfg(feature = "tracing")]
        tracing::warn!(target: "quantdle::diagnostics", warning = %warning, "recoverable condition");
        self.warnings.push(warning);
    }

    /// Move every warning from `other` into this sink, preserving order.
    pub fn absorb(&mut self, other: Self) {
        self.warnings.extend(other.warnings);
    }

    /// Warnings recorded so far, in emission order.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of recorded warnings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Consume the sink.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

impl Extend<Warning> for Diagnostics {
    fn extend<T: IntoIterator<Item = Warning>>(&mut self, iter: T) {
        for w in iter {
            self.warn(w);
        }
    }
}

/// Observer for download progress.
///
/// Purely observational: implementations must not influence results. All
/// methods default to no-ops.
pub trait ProgressSink: Send + Sync {
    /// The request was split into `count` windows.
    fn windows_planned(&self, count: usize) {
        let _ = count;
    }

    /// Window `index` (zero-based) of `count` is starting.
    fn window_started(&self, index: usize, count: usize, window: &DateRange) {
        let _ = (index, count, window);
    }

    /// `completed` of `total` archive locations in the current window have finished,
    /// successfully or not.
    fn location_finished(&self, completed: usize, total: usize) {
        let _ = (completed, total);
    }
}

/// Progress sink that emits `tracing` events (no-op without the `tracing` feature).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn windows_planned(&self, count: usize) {
        #[cfg(feature = "tracing")]
        tracing::info!(target: "quantdle::progress", windows = count, "download planned");
        #[cfg(not(feature = "tracing"))]
        let _ = count;
    }

    fn window_started(&self, index: usize, count: usize, window: &DateRange) {
        #[cfg(feature = "tracing")]
        tracing::info!(target: "quantdle::progress", chunk = index + 1, of = count, window = %window, "downloading chunk");
        #[cfg(not(feature = "tracing"))]
        let _ = (index, count, window);
    }

    fn location_finished(&self, completed: usize, total: usize) {
        #[cfg(feature = "tracing")]
        tracing::info!(target: "quantdle::progress", completed, total, "archive finished");
        #[cfg(not(feature = "tracing"))]
        let _ = (completed, total);
    }
}
