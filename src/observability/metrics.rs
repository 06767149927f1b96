//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): completed requests by route, method, status
//! - `http_request_duration_seconds` (histogram): latency by the same labels
//! - `http_requests_in_flight` (gauge): requests started but not yet completed
//!
//! The in-flight count is owned by [`MetricsRecorder`] and only ever moves
//! through [`MetricsRecorder::start_request`] and the returned guard's
//! `Drop`, so it cannot go negative and cannot leak an increment on any
//! exit path. The counter and histogram for a label tuple are written in
//! the same drop, so the counter always equals the histogram's sample
//! count for that tuple.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Metric names, shared with the tests that scrape the exposition.
pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const REQUESTS_IN_FLIGHT: &str = "http_requests_in_flight";

/// Histogram bucket boundaries in seconds, 5ms through 10s.
pub const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the process-wide Prometheus recorder and return the handle
/// that renders the exposition body for `GET /metrics`.
///
/// Fails if a recorder is already installed; call once from `main`.
pub fn install_exporter() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
            DURATION_BUCKETS,
        )?
        .install_recorder()?;

    describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Duration of HTTP requests in seconds"
    );
    describe_gauge!(REQUESTS_IN_FLIGHT, "Number of requests currently in flight");

    Ok(handle)
}

/// Owns the in-flight gauge and records one observation per request.
///
/// Cheap to clone; clones share the same gauge.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder {
    in_flight: Arc<AtomicI64>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current in-flight count. Read-only: mutation happens only through
    /// [`Self::start_request`] and guard drop.
    pub fn in_flight(&self) -> i64 {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Mark a request as started.
    ///
    /// The returned guard decrements the gauge and records exactly one
    /// `(route, method, status)` observation when dropped, on every exit
    /// path. A guard dropped before [`RequestGuard::complete`] records
    /// status 500, which is what an unwound handler amounts to.
    pub fn start_request(
        &self,
        route: impl Into<String>,
        method: impl Into<String>,
    ) -> RequestGuard {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        gauge!(REQUESTS_IN_FLIGHT).increment(1.0);
        RequestGuard {
            in_flight: Arc::clone(&self.in_flight),
            route: route.into(),
            method: method.into(),
            status: 500,
            started: Instant::now(),
        }
    }
}

/// Scoped completion hook for one request.
#[derive(Debug)]
pub struct RequestGuard {
    in_flight: Arc<AtomicI64>,
    route: String,
    method: String,
    status: u16,
    started: Instant,
}

impl RequestGuard {
    /// Record the status the request completed with.
    pub fn complete(&mut self, status: u16) {
        self.status = status;
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        gauge!(REQUESTS_IN_FLIGHT).decrement(1.0);

        let duration = self.started.elapsed().as_secs_f64();
        let status = self.status.to_string();
        counter!(
            REQUESTS_TOTAL,
            "route" => self.route.clone(),
            "method" => self.method.clone(),
            "status" => status.clone()
        )
        .increment(1);
        histogram!(
            REQUEST_DURATION_SECONDS,
            "route" => self.route.clone(),
            "method" => self.method.clone(),
            "status" => status
        )
        .record(duration);
    }
}
