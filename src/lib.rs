//! Synthetic Workload Service and Load Driver
//!
//! A controllable synthetic workload for exercising observability
//! pipelines: a mock service that emits configurable latency, error
//! rates, and per-request metrics, plus a load driver that generates
//! weighted traffic against it at a fixed target rate, optionally in a
//! chaos mode that skews selection and forces failures.

// Core subsystems
pub mod catalog;
pub mod config;
pub mod driver;
pub mod service;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{DriverConfig, ServiceConfig};
pub use driver::LoadDriver;
pub use lifecycle::Shutdown;
pub use service::SimulatedService;
