//! The simulated service.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → middleware.rs (request id, in-flight guard via MetricsRecorder)
//!     → handlers.rs (per-endpoint flow)
//!         → latency.rs sample → async timer suspends this request only
//!         → failure.rs decide → RequestOutcome
//!     → response (guard records the completed observation on drop)
//! ```

pub mod failure;
pub mod handlers;
pub mod latency;
pub mod middleware;
pub mod server;

pub use failure::{ErrorInjector, RequestOutcome, FORCE_ERROR_HEADER, FORCE_ERROR_SENTINEL};
pub use latency::LatencySimulator;
pub use server::SimulatedService;
