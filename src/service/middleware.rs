//! Request tracking middleware.
//!
//! Wraps every route in a scoped completion guard: the in-flight gauge is
//! incremented before the handler runs, and the completed observation is
//! recorded when the guard drops. The guard drops on every exit path,
//! including handler panics and timeout cancellation.

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::service::server::AppState;

pub async fn track_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().to_string();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        route = %route,
        "Request started"
    );

    let mut guard = state.recorder.start_request(route.clone(), method);
    let response = next.run(request).await;
    let status = response.status();
    guard.complete(status.as_u16());
    drop(guard);

    if status.is_server_error() {
        tracing::warn!(request_id = %request_id, route = %route, status = %status, "Request failed");
    } else {
        tracing::debug!(request_id = %request_id, route = %route, status = %status, "Request completed");
    }

    response
}
