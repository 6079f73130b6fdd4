//! Metrics collection for conversion monitoring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use coinconv_fx::{ConversionResult, FxError, FxResult, RateOrigin};

/// Service metrics.
pub struct Metrics {
    /// Total conversion requests received.
    pub requests_total: AtomicU64,
    /// Conversions answered from cache.
    pub served_from_cache: AtomicU64,
    /// Conversions answered by a direct source fetch.
    pub served_direct: AtomicU64,
    /// Conversions answered through an intermediary currency.
    pub served_via_intermediary: AtomicU64,
    /// Conversions with no rate anywhere.
    pub not_found: AtomicU64,
    /// Requests rejected before or during resolution.
    pub rejected: AtomicU64,
}

impl Metrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            requests_total: AtomicU64::new(0),
            served_from_cache: AtomicU64::new(0),
            served_direct: AtomicU64::new(0),
            served_via_intermediary: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Increment requests received.
    pub fn request_received(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one conversion.
    pub fn record(&self, outcome: &FxResult<ConversionResult>) {
        let counter = match outcome {
            Ok(result) => match result.origin {
                RateOrigin::Cache => &self.served_from_cache,
                RateOrigin::Preferred | RateOrigin::Fallback => &self.served_direct,
                RateOrigin::Intermediary { .. } => &self.served_via_intermediary,
            },
            Err(FxError::ConversionNotFound(_)) => &self.not_found,
            Err(_) => &self.rejected,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            served_from_cache: self.served_from_cache.load(Ordering::Relaxed),
            served_direct: self.served_direct.load(Ordering::Relaxed),
            served_via_intermediary: self.served_via_intermediary.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"# HELP coinconv_requests_total Total conversion requests
# TYPE coinconv_requests_total counter
coinconv_requests_total {}

# HELP coinconv_conversions_total Successful conversions by rate origin
# TYPE coinconv_conversions_total counter
coinconv_conversions_total{{origin="cache"}} {}
coinconv_conversions_total{{origin="direct"}} {}
coinconv_conversions_total{{origin="intermediary"}} {}

# HELP coinconv_not_found_total Conversions with no available rate
# TYPE coinconv_not_found_total counter
coinconv_not_found_total {}

# HELP coinconv_rejected_total Rejected conversion requests
# TYPE coinconv_rejected_total counter
coinconv_rejected_total {}
"#,
            snapshot.requests_total,
            snapshot.served_from_cache,
            snapshot.served_direct,
            snapshot.served_via_intermediary,
            snapshot.not_found,
            snapshot.rejected,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub served_from_cache: u64,
    pub served_direct: u64,
    pub served_via_intermediary: u64,
    pub not_found: u64,
    pub rejected: u64,
}

/// Shared metrics instance.
pub type SharedMetrics = Arc<Metrics>;
