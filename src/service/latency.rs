//! Latency simulation.

use std::sync::Mutex;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::EndpointClass;

/// Draws a bounded random delay per endpoint class.
///
/// The delay is applied by the handler as an async timer, so it suspends
/// only the request being served, never the accept loop or other
/// in-flight requests.
#[derive(Debug)]
pub struct LatencySimulator {
    rng: Mutex<StdRng>,
}

impl LatencySimulator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Explicit rng for reproducible delay sequences.
    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Sample a delay uniformly from the class's closed range.
    pub fn sample(&self, class: EndpointClass) -> Duration {
        let ms = self
            .rng
            .lock()
            .expect("latency rng mutex poisoned")
            .gen_range(class.latency_range_ms());
        Duration::from_millis(ms)
    }
}

impl Default for LatencySimulator {
    fn default() -> Self {
        Self::new()
    }
}
