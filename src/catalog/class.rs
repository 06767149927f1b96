//! Endpoint classes and their traffic characteristics.

use std::ops::RangeInclusive;

/// The fixed set of simulated API endpoints.
///
/// Latency ranges and baseline failure probabilities are deliberately
/// distinct per class so downstream dashboards see multi-modal
/// distributions instead of one blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    /// Moderate latency with a small baseline failure rate.
    Orders,
    /// Fast and stable; only fails when forced.
    Users,
    /// Simulates slow database queries.
    Slow,
}

impl EndpointClass {
    /// Request path served by this class.
    pub fn path(&self) -> &'static str {
        match self {
            EndpointClass::Orders => "/api/orders",
            EndpointClass::Users => "/api/users",
            EndpointClass::Slow => "/api/slow",
        }
    }

    /// Name used in injected error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            EndpointClass::Orders => "Order",
            EndpointClass::Users => "User",
            EndpointClass::Slow => "Slow",
        }
    }

    /// Closed latency range in milliseconds.
    pub fn latency_range_ms(&self) -> RangeInclusive<u64> {
        match self {
            EndpointClass::Orders => 50..=300,
            EndpointClass::Users => 10..=50,
            EndpointClass::Slow => 2000..=5000,
        }
    }

    /// Probability that an unforced request to this class fails.
    pub fn baseline_failure_rate(&self) -> f64 {
        match self {
            EndpointClass::Orders => 0.02,
            EndpointClass::Users | EndpointClass::Slow => 0.0,
        }
    }
}
