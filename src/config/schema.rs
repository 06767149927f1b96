//! Configuration schema definitions.
//!
//! All types derive Serde traits and carry the documented defaults in
//! their `Default` impls; the environment loader in `env.rs` only
//! overrides fields whose variables are present.

use serde::{Deserialize, Serialize};

/// Configuration for the simulated service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Service identity string attached to startup logs.
    pub service_name: String,

    /// Request timeout in seconds. Must exceed the slowest latency class.
    pub request_timeout_secs: u64,

    /// Optional seed for the latency and error-injection rngs; set for
    /// reproducible runs, unset to seed from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            service_name: "synthload".to_string(),
            request_timeout_secs: 30,
            rng_seed: None,
        }
    }
}

/// Configuration for the load driver.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Base URL of the target service.
    pub target_url: String,

    /// Target dispatch rate in requests per second.
    pub rate: f64,

    /// Chaos mode: skewed endpoint pool plus a forced-error layer.
    pub chaos: bool,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Optional cap on concurrently outstanding requests. Unset leaves
    /// dispatch unbounded, which grows without limit against a target
    /// slower than the dispatch interval.
    pub max_in_flight: Option<usize>,

    /// Optional seed for the selection and chaos rngs.
    pub rng_seed: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            target_url: "http://localhost:3000".to_string(),
            rate: 10.0,
            chaos: false,
            request_timeout_secs: 10,
            max_in_flight: None,
            rng_seed: None,
        }
    }
}
