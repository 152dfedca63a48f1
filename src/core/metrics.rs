//! Logger metrics for observability
//!
//! Counters for the record construction path. The capture counters double as
//! instrumentation: a field set without runtime fields must never move
//! `runtime_captures`.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for record construction
///
/// # Example
///
/// ```
/// use rust_logger_fields::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_built();
/// metrics.record_capture();
///
/// assert_eq!(metrics.records_built(), 1);
/// assert_eq!(metrics.runtime_captures(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Number of records constructed
    records_built: AtomicU64,

    /// Number of runtime (call-site) captures attempted
    runtime_captures: AtomicU64,

    /// Number of captures that fell back to sentinel values
    capture_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_built: AtomicU64::new(0),
            runtime_captures: AtomicU64::new(0),
            capture_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_built(&self) -> u64 {
        self.records_built.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn runtime_captures(&self) -> u64 {
        self.runtime_captures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn capture_failures(&self) -> u64 {
        self.capture_failures.load(Ordering::Relaxed)
    }

    /// Record a constructed record, returning the previous count
    #[inline]
    pub fn record_built(&self) -> u64 {
        self.records_built.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a runtime capture, returning the previous count
    #[inline]
    pub fn record_capture(&self) -> u64 {
        self.runtime_captures.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed capture, returning the previous count
    #[inline]
    pub fn record_capture_failure(&self) -> u64 {
        self.capture_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Percentage of runtime captures that fell back to sentinels
    pub fn capture_failure_rate(&self) -> f64 {
        let captures = self.runtime_captures();
        if captures == 0 {
            return 0.0;
        }
        (self.capture_failures() as f64 / captures as f64) * 100.0
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.records_built.store(0, Ordering::Relaxed);
        self.runtime_captures.store(0, Ordering::Relaxed);
        self.capture_failures.store(0, Ordering::Relaxed);
    }
}
