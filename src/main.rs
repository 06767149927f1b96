//! Simulated service binary.
//!
//! Serves the mock API endpoints with per-class latency, injected
//! failures, and Prometheus metrics at `/metrics`.

use tokio::net::TcpListener;

use synthload::config;
use synthload::lifecycle::{signals, Shutdown};
use synthload::observability::{logging, metrics};
use synthload::SimulatedService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("synthload=info,tower_http=warn");

    let config = config::service_config_from_env()?;
    tracing::info!(
        service = %config.service_name,
        bind_address = %config.bind_address,
        request_timeout_secs = config.request_timeout_secs,
        "Configuration loaded"
    );

    // Failure to bind is the only fatal condition.
    let listener = TcpListener::bind(&config.bind_address).await?;
    let metrics_handle = metrics::install_exporter()?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_signal(shutdown));

    let service = SimulatedService::new(&config, Some(metrics_handle));
    service.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
