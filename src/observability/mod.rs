//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! request lifecycle
//!     → metrics.rs (in-flight gauge, counter + histogram per label tuple)
//!     → logging.rs (structured events via tracing)
//!
//! Consumers:
//!     → GET /metrics (Prometheus exposition via PrometheusHandle)
//!     → stdout logs (EnvFilter-controlled)
//! ```

pub mod logging;
pub mod metrics;

pub use metrics::{MetricsRecorder, RequestGuard};
