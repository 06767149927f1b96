//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;
use tokio::net::TcpListener;

use synthload::config::ServiceConfig;
use synthload::lifecycle::Shutdown;
use synthload::observability::MetricsRecorder;
use synthload::SimulatedService;

/// Spawn the simulated service on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_service(config: ServiceConfig) -> (SocketAddr, MetricsRecorder, Shutdown) {
    spawn_service_with_handle(config, None).await
}

/// Spawn the simulated service with a Prometheus handle wired into
/// `GET /metrics`.
#[allow(dead_code)]
pub async fn spawn_service_with_handle(
    config: ServiceConfig,
    metrics_handle: Option<metrics_exporter_prometheus::PrometheusHandle>,
) -> (SocketAddr, MetricsRecorder, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let service = SimulatedService::new(&config, metrics_handle);
    let recorder = service.recorder().clone();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = service.run(listener, rx).await;
    });

    (addr, recorder, shutdown)
}

/// One request observed by the recording target.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct ObservedRequest {
    pub path: String,
    pub forced_error: bool,
}

#[derive(Clone)]
#[allow(dead_code)]
struct TargetState {
    seen: Arc<Mutex<Vec<ObservedRequest>>>,
    delay: Duration,
}

#[allow(dead_code)]
async fn record(State(state): State<TargetState>, uri: Uri, headers: HeaderMap) -> StatusCode {
    state.seen.lock().unwrap().push(ObservedRequest {
        path: uri.path().to_string(),
        forced_error: headers
            .get("x-force-error")
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value == "true"),
    });
    tokio::time::sleep(state.delay).await;
    StatusCode::OK
}

/// Start a mock target that records every request on arrival and answers
/// 200 after a fixed delay.
#[allow(dead_code)]
pub async fn start_recording_target(
    delay: Duration,
) -> (SocketAddr, Arc<Mutex<Vec<ObservedRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = TargetState {
        seen: Arc::clone(&seen),
        delay,
    };

    let app = Router::new().fallback(record).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, seen)
}
