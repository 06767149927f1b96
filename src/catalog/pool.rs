//! Weighted endpoint pools and selection.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::class::EndpointClass;

/// A single endpoint descriptor with a relative selection weight.
///
/// Weights are relative, not normalized; a pool's weights only need a
/// positive sum.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub class: EndpointClass,
    pub weight: u32,
}

/// An ordered set of endpoints with relative weights, immutable once the
/// active pool has been chosen at startup.
#[derive(Debug, Clone)]
pub struct WeightedPool {
    entries: Vec<Endpoint>,
}

impl WeightedPool {
    /// Even traffic split across all endpoints.
    pub fn normal() -> Self {
        Self {
            entries: vec![
                Endpoint {
                    class: EndpointClass::Orders,
                    weight: 1,
                },
                Endpoint {
                    class: EndpointClass::Users,
                    weight: 1,
                },
                Endpoint {
                    class: EndpointClass::Slow,
                    weight: 1,
                },
            ],
        }
    }

    /// Chaos split: the slow endpoint draws 80% of traffic.
    pub fn chaos() -> Self {
        Self {
            entries: vec![
                Endpoint {
                    class: EndpointClass::Slow,
                    weight: 8,
                },
                Endpoint {
                    class: EndpointClass::Orders,
                    weight: 1,
                },
                Endpoint {
                    class: EndpointClass::Users,
                    weight: 1,
                },
            ],
        }
    }

    /// Pool selected by the chaos-mode flag, once at process start.
    pub fn for_mode(chaos: bool) -> Self {
        if chaos {
            Self::chaos()
        } else {
            Self::normal()
        }
    }

    pub fn entries(&self) -> &[Endpoint] {
        &self.entries
    }

    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|endpoint| endpoint.weight).sum()
    }

    /// Resolve a roll in `[0, total_weight)` to an endpoint by walking the
    /// entries in declaration order, subtracting each weight.
    ///
    /// Falls back to the first entry if floating-point error leaves the
    /// roll positive after the final subtraction.
    fn resolve(&self, mut roll: f64) -> &Endpoint {
        for endpoint in &self.entries {
            roll -= f64::from(endpoint.weight);
            if roll <= 0.0 {
                return endpoint;
            }
        }
        &self.entries[0]
    }
}

/// Weighted random endpoint selection over the active pool.
#[derive(Debug)]
pub struct EndpointCatalog {
    pool: WeightedPool,
    rng: Mutex<StdRng>,
}

impl EndpointCatalog {
    /// Catalog over `pool`, seeded from entropy.
    pub fn new(pool: WeightedPool) -> Self {
        Self::with_rng(pool, StdRng::from_entropy())
    }

    /// Catalog with an explicit rng for reproducible selection sequences.
    pub fn with_rng(pool: WeightedPool, rng: StdRng) -> Self {
        Self {
            pool,
            rng: Mutex::new(rng),
        }
    }

    /// Draw one endpoint, honoring the relative weights.
    pub fn select(&self) -> Endpoint {
        let total = f64::from(self.pool.total_weight());
        let roll = self
            .rng
            .lock()
            .expect("catalog rng mutex poisoned")
            .gen_range(0.0..total);
        *self.pool.resolve(roll)
    }

    pub fn pool(&self) -> &WeightedPool {
        &self.pool
    }
}
