//! Decision provider metrics.
//!
//! Tracks provider call counts, failures, and latency.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Provider call metrics recorded by the decision worker.
///
/// Uses atomics for lock-free access from concurrent decision tasks.
#[derive(Debug, Default)]
pub struct DecisionMetrics {
    /// Provider calls that returned, successfully or not
    invocations: AtomicU64,

    /// Provider calls that returned an error
    provider_failures: AtomicU64,

    /// Answers that did not parse as an integer claim
    parse_failures: AtomicU64,

    /// Sum of all call durations, in nanoseconds
    total_latency_nanos: AtomicU64,

    /// Slowest call observed, in nanoseconds
    slowest_latency_nanos: AtomicU64,
}

impl DecisionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed provider call.
    pub fn record_invocation(&self, latency: Duration, failed: bool) {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.invocations.fetch_add(1, Ordering::Relaxed);
        self.total_latency_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.slowest_latency_nanos.fetch_max(nanos, Ordering::Relaxed);
        if failed {
            self.provider_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    pub fn provider_failures(&self) -> u64 {
        self.provider_failures.load(Ordering::Relaxed)
    }

    pub fn parse_failures(&self) -> u64 {
        self.parse_failures.load(Ordering::Relaxed)
    }

    pub fn avg_latency(&self) -> Duration {
        let invocations = self.invocations();
        if invocations == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_latency_nanos.load(Ordering::Relaxed) / invocations)
        }
    }

    pub fn slowest_latency(&self) -> Duration {
        Duration::from_nanos(self.slowest_latency_nanos.load(Ordering::Relaxed))
    }

    /// Creates a snapshot of all metrics for display/logging.
    ///
    /// Fields are read individually, so the snapshot may be inconsistent if
    /// decisions are still being collected.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            invocations: self.invocations(),
            provider_failures: self.provider_failures(),
            parse_failures: self.parse_failures(),
            avg_latency: self.avg_latency(),
            slowest_latency: self.slowest_latency(),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub invocations: u64,
    pub provider_failures: u64,
    pub parse_failures: u64,
    pub avg_latency: Duration,
    pub slowest_latency: Duration,
}
