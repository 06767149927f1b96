//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → env.rs (read & parse, schema defaults for missing variables)
//!     → schema.rs structs (typed, validated)
//!     → handed immutably to the service / driver at startup
//! ```
//!
//! Configuration is read once at startup and never reloaded. The active
//! endpoint pool in particular is fixed for the process lifetime by the
//! chaos-mode flag.

pub mod env;
pub mod schema;

pub use env::{driver_config_from_env, service_config_from_env, ConfigError};
pub use schema::{DriverConfig, ServiceConfig};
