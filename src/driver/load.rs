//! Traffic generation against the simulated service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tokio::sync::{broadcast, Semaphore};
use url::Url;
use uuid::Uuid;

use crate::catalog::{EndpointCatalog, WeightedPool};
use crate::config::DriverConfig;
use crate::driver::governor::RateGovernor;
use crate::service::failure::{FORCE_ERROR_HEADER, FORCE_ERROR_SENTINEL};

/// Probability that a chaos-mode dispatch carries the force-error signal.
/// Independent of the service's own baseline policy; the two compound.
pub const CHAOS_FORCE_ERROR_RATE: f64 = 0.2;

/// Error type for driver startup.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("target URL {url:?} is invalid: {source}")]
    InvalidTarget {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("dispatch rate must be positive, got {rate}")]
    InvalidRate { rate: f64 },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Monotonic counters for dispatched traffic.
#[derive(Debug, Default)]
pub struct DriverStats {
    dispatched: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    shed: AtomicU64,
}

impl DriverStats {
    /// Requests handed to the HTTP client.
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Responses with status < 500.
    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    /// Responses with status ≥ 500, timeouts, and connection failures.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Dispatches dropped because the admission gate was saturated.
    pub fn shed(&self) -> u64 {
        self.shed.load(Ordering::Relaxed)
    }
}

/// Generates traffic at a fixed rate against a target service.
///
/// Dispatches are fire-and-forget: the next tick is scheduled without
/// waiting for any response, so cadence survives a slow or unreachable
/// target. Without an admission cap the number of outstanding requests
/// grows unbounded against a target slower than the dispatch interval.
pub struct LoadDriver {
    client: reqwest::Client,
    catalog: EndpointCatalog,
    target: Url,
    chaos: bool,
    rate: f64,
    chaos_rng: Mutex<StdRng>,
    admission: Option<Arc<Semaphore>>,
    stats: Arc<DriverStats>,
}

impl LoadDriver {
    /// Build a driver from its configuration.
    ///
    /// The active pool is chosen here, once, from the chaos flag, and is
    /// never swapped afterwards.
    pub fn new(config: &DriverConfig) -> Result<Self, DriverError> {
        if config.rate <= 0.0 || config.rate.is_nan() {
            return Err(DriverError::InvalidRate { rate: config.rate });
        }
        let target = Url::parse(&config.target_url).map_err(|source| DriverError::InvalidTarget {
            url: config.target_url.clone(),
            source,
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let (catalog_rng, chaos_rng) = match config.rng_seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        Ok(Self {
            client,
            catalog: EndpointCatalog::with_rng(WeightedPool::for_mode(config.chaos), catalog_rng),
            target,
            chaos: config.chaos,
            rate: config.rate,
            chaos_rng: Mutex::new(chaos_rng),
            admission: config
                .max_in_flight
                .map(|cap| Arc::new(Semaphore::new(cap))),
            stats: Arc::new(DriverStats::default()),
        })
    }

    /// Counters for dispatched traffic.
    pub fn stats(&self) -> Arc<DriverStats> {
        Arc::clone(&self.stats)
    }

    /// Dispatch at the configured rate until the shutdown signal fires.
    ///
    /// On shutdown the loop stops scheduling new dispatches and returns
    /// without draining outstanding requests.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        let mut governor = RateGovernor::new(self.rate);
        tracing::info!(
            target = %self.target,
            rate = self.rate,
            interval_ms = governor.period().as_millis() as u64,
            chaos = self.chaos,
            "Load driver starting"
        );
        if self.chaos {
            tracing::warn!(
                forced_error_rate = CHAOS_FORCE_ERROR_RATE,
                "Chaos mode active: traffic skewed toward the slow endpoint, forced-error layer on"
            );
        }

        loop {
            tokio::select! {
                _ = governor.tick() => self.dispatch(),
                _ = shutdown.recv() => {
                    tracing::info!(
                        dispatched = self.stats.dispatched(),
                        succeeded = self.stats.succeeded(),
                        failed = self.stats.failed(),
                        "Shutdown signal received, load driver stopping without draining"
                    );
                    break;
                }
            }
        }
    }

    /// Fire one request without awaiting its completion.
    fn dispatch(&self) {
        let endpoint = self.catalog.select();
        let path = endpoint.class.path();
        let force_error = self.chaos && self.roll_forced_error();

        let permit = match &self.admission {
            Some(gate) => match Arc::clone(gate).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    self.stats.shed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(endpoint = path, "Admission gate saturated, shedding dispatch");
                    return;
                }
            },
            None => None,
        };

        let url = match self.target.join(path) {
            Ok(url) => url,
            Err(error) => {
                tracing::error!(endpoint = path, error = %error, "Failed to build request URL");
                return;
            }
        };

        let request_id = Uuid::new_v4();
        let mut request = self
            .client
            .get(url)
            .header("x-request-id", request_id.to_string());
        if force_error {
            request = request.header(FORCE_ERROR_HEADER, FORCE_ERROR_SENTINEL);
        }

        self.stats.dispatched.fetch_add(1, Ordering::Relaxed);
        let stats = Arc::clone(&self.stats);

        tokio::spawn(async move {
            let _permit = permit;
            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() >= 500 {
                        stats.failed.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(
                            request_id = %request_id,
                            endpoint = path,
                            status = %status,
                            "Request failed"
                        );
                    } else {
                        let latency_ms = response
                            .json::<serde_json::Value>()
                            .await
                            .ok()
                            .and_then(|body| body.get("latency_ms").and_then(|v| v.as_u64()));
                        stats.succeeded.fetch_add(1, Ordering::Relaxed);
                        tracing::info!(
                            request_id = %request_id,
                            endpoint = path,
                            status = %status,
                            latency_ms = ?latency_ms,
                            "Request completed"
                        );
                    }
                }
                Err(error) => {
                    stats.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(
                        request_id = %request_id,
                        endpoint = path,
                        error = %error,
                        "Request errored"
                    );
                }
            }
        });
    }

    fn roll_forced_error(&self) -> bool {
        self.chaos_rng
            .lock()
            .expect("chaos rng mutex poisoned")
            .gen_bool(CHAOS_FORCE_ERROR_RATE)
    }
}
