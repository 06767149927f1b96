//! HTTP server setup for the simulated service.
//!
//! # Responsibilities
//! - Create the Axum router with all endpoint handlers
//! - Wire up middleware (tracing, timeout, request tracking)
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::observability::metrics::MetricsRecorder;
use crate::service::failure::ErrorInjector;
use crate::service::handlers;
use crate::service::latency::LatencySimulator;
use crate::service::middleware::track_request;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub latency: Arc<LatencySimulator>,
    pub failures: Arc<ErrorInjector>,
    pub recorder: MetricsRecorder,
    pub metrics_handle: Option<PrometheusHandle>,
}

/// The simulated service: a fixed set of endpoints with per-class
/// latency, injected failures, and full request instrumentation.
pub struct SimulatedService {
    router: Router,
    recorder: MetricsRecorder,
}

impl SimulatedService {
    /// Assemble the service from its configuration.
    ///
    /// With `rng_seed` set, latency and error-injection sequences are
    /// reproducible; the two components get adjacent seeds so their draws
    /// stay independent.
    pub fn new(config: &ServiceConfig, metrics_handle: Option<PrometheusHandle>) -> Self {
        let (latency_rng, failure_rng) = match config.rng_seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        let recorder = MetricsRecorder::new();
        let state = AppState {
            latency: Arc::new(LatencySimulator::with_rng(latency_rng)),
            failures: Arc::new(ErrorInjector::with_rng(failure_rng)),
            recorder: recorder.clone(),
            metrics_handle,
        };

        let router = Self::build_router(config, state);
        Self { router, recorder }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/api/orders", get(handlers::orders))
            .route("/api/users", get(handlers::users))
            .route("/api/slow", get(handlers::slow))
            .route("/health", get(handlers::health))
            .route("/metrics", get(handlers::metrics))
            .layer(middleware::from_fn_with_state(state.clone(), track_request))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// The recorder backing this service's in-flight gauge.
    pub fn recorder(&self) -> &MetricsRecorder {
        &self.recorder
    }

    /// Serve on `listener` until the shutdown signal fires.
    ///
    /// Shutdown stops accepting and returns immediately; in-flight
    /// requests are abandoned rather than drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Simulated service listening");

        let server = async move { axum::serve(listener, self.router).await };
        tokio::select! {
            result = server => result?,
            _ = shutdown.recv() => {
                tracing::info!("Shutdown signal received, abandoning in-flight requests");
            }
        }

        tracing::info!("Simulated service stopped");
        Ok(())
    }
}
