//! Error injection and request outcomes.
//!
//! Injected failures are deliberate 500s, forced or probabilistic, and
//! are indistinguishable on the wire from genuine failures.

use std::sync::Mutex;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::catalog::EndpointClass;

/// Header carrying the per-request force-error signal.
pub const FORCE_ERROR_HEADER: &str = "x-force-error";
/// The only header value treated as a forced error; anything else is
/// "not forced".
pub const FORCE_ERROR_SENTINEL: &str = "true";

/// Whether the request explicitly asks to fail.
pub fn force_error_requested(headers: &HeaderMap) -> bool {
    headers
        .get(FORCE_ERROR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value == FORCE_ERROR_SENTINEL)
}

/// Decides, per request, whether the response is a simulated failure.
#[derive(Debug)]
pub struct ErrorInjector {
    rng: Mutex<StdRng>,
}

impl ErrorInjector {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Explicit rng for reproducible failure sequences.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Short-circuit policy: a forced request always fails, regardless of
    /// class or any random draw; otherwise a Bernoulli draw at the class
    /// baseline decides.
    pub fn should_fail(&self, class: EndpointClass, force_error_requested: bool) -> bool {
        if force_error_requested {
            return true;
        }
        let baseline = class.baseline_failure_rate();
        if baseline == 0.0 {
            return false;
        }
        self.rng
            .lock()
            .expect("error injector rng mutex poisoned")
            .gen_bool(baseline)
    }
}

impl Default for ErrorInjector {
    fn default() -> Self {
        Self::new()
    }
}

/// The terminal state of one simulated request.
#[derive(Debug)]
pub enum RequestOutcome {
    Success {
        latency_ms: u64,
        payload: serde_json::Value,
    },
    Failure {
        status: StatusCode,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl RequestOutcome {
    /// Success outcome for a class, including its demo payload.
    pub fn success(class: EndpointClass, latency_ms: u64) -> Self {
        RequestOutcome::Success {
            latency_ms,
            payload: success_payload(class, latency_ms),
        }
    }

    /// Injected failure for a class.
    pub fn failure(class: EndpointClass) -> Self {
        RequestOutcome::Failure {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: format!("{} service temporarily unavailable", class.display_name()),
            timestamp: Utc::now(),
        }
    }
}

impl IntoResponse for RequestOutcome {
    fn into_response(self) -> Response {
        match self {
            RequestOutcome::Success { payload, .. } => Json(payload).into_response(),
            RequestOutcome::Failure {
                status,
                error,
                timestamp,
            } => (
                status,
                Json(json!({
                    "error": error,
                    "timestamp": timestamp.to_rfc3339(),
                })),
            )
                .into_response(),
        }
    }
}

fn success_payload(class: EndpointClass, latency_ms: u64) -> serde_json::Value {
    let timestamp = Utc::now().to_rfc3339();
    match class {
        EndpointClass::Orders => json!({
            "orders": [
                { "id": 1, "product": "Widget A", "quantity": 10, "price": 29.99 },
                { "id": 2, "product": "Widget B", "quantity": 5, "price": 49.99 },
            ],
            "latency_ms": latency_ms,
            "timestamp": timestamp,
        }),
        EndpointClass::Users => json!({
            "users": [
                { "id": 1, "name": "Alice", "email": "alice@example.com" },
                { "id": 2, "name": "Bob", "email": "bob@example.com" },
            ],
            "latency_ms": latency_ms,
            "timestamp": timestamp,
        }),
        EndpointClass::Slow => json!({
            "message": "This endpoint simulates slow database queries",
            "latency_ms": latency_ms,
            "timestamp": timestamp,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forcing_always_fails_for_every_class() {
        let injector = ErrorInjector::with_rng(StdRng::seed_from_u64(1));
        for class in [EndpointClass::Orders, EndpointClass::Users, EndpointClass::Slow] {
            for _ in 0..1_000 {
                assert!(injector.should_fail(class, true));
            }
        }
    }

    #[test]
    fn orders_baseline_rate_holds_within_half_a_percent() {
        let injector = ErrorInjector::with_rng(StdRng::seed_from_u64(2));
        let trials = 100_000;
        let failures = (0..trials)
            .filter(|_| injector.should_fail(EndpointClass::Orders, false))
            .count();
        let rate = failures as f64 / f64::from(trials);
        assert!(
            (rate - 0.02).abs() < 0.005,
            "observed failure rate {rate} outside 2% ± 0.5%"
        );
    }

    #[test]
    fn zero_baseline_classes_never_fail_unforced() {
        let injector = ErrorInjector::with_rng(StdRng::seed_from_u64(3));
        for class in [EndpointClass::Users, EndpointClass::Slow] {
            for _ in 0..10_000 {
                assert!(!injector.should_fail(class, false));
            }
        }
    }

    #[test]
    fn only_the_sentinel_value_forces_an_error() {
        let mut headers = HeaderMap::new();
        assert!(!force_error_requested(&headers));

        headers.insert(FORCE_ERROR_HEADER, HeaderValue::from_static("1"));
        assert!(!force_error_requested(&headers));

        headers.insert(FORCE_ERROR_HEADER, HeaderValue::from_static("TRUE"));
        assert!(!force_error_requested(&headers));

        headers.insert(FORCE_ERROR_HEADER, HeaderValue::from_static("true"));
        assert!(force_error_requested(&headers));
    }

    #[test]
    fn failure_outcome_carries_the_class_error_message() {
        let outcome = RequestOutcome::failure(EndpointClass::Orders);
        match outcome {
            RequestOutcome::Failure { status, error, .. } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(error, "Order service temporarily unavailable");
            }
            RequestOutcome::Success { .. } => panic!("expected a failure outcome"),
        }
    }

    #[test]
    fn success_payloads_carry_the_sampled_latency() {
        for class in [EndpointClass::Orders, EndpointClass::Users, EndpointClass::Slow] {
            match RequestOutcome::success(class, 123) {
                RequestOutcome::Success {
                    latency_ms,
                    payload,
                } => {
                    assert_eq!(latency_ms, 123);
                    assert_eq!(payload["latency_ms"], 123);
                    assert!(payload["timestamp"].is_string());
                }
                RequestOutcome::Failure { .. } => panic!("expected a success outcome"),
            }
        }
    }
}
