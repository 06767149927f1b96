//! Per-endpoint request handlers.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde_json::json;

use crate::catalog::EndpointClass;
use crate::service::failure::{force_error_requested, RequestOutcome};
use crate::service::server::AppState;

/// GET /api/orders
pub async fn orders(state: State<AppState>, headers: HeaderMap) -> Response {
    simulate(EndpointClass::Orders, state, headers).await
}

/// GET /api/users
pub async fn users(state: State<AppState>, headers: HeaderMap) -> Response {
    simulate(EndpointClass::Users, state, headers).await
}

/// GET /api/slow
pub async fn slow(state: State<AppState>, headers: HeaderMap) -> Response {
    simulate(EndpointClass::Slow, state, headers).await
}

/// Shared endpoint flow: suspend for the sampled latency, then let the
/// injector decide the outcome.
async fn simulate(
    class: EndpointClass,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let delay = state.latency.sample(class);
    tokio::time::sleep(delay).await;

    let forced = force_error_requested(&headers);
    let outcome = if state.failures.should_fail(class, forced) {
        RequestOutcome::failure(class)
    } else {
        RequestOutcome::success(class, delay.as_millis() as u64)
    };
    outcome.into_response()
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics_handle {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
