//! Endpoint catalog subsystem.
//!
//! # Data Flow
//! ```text
//! startup (chaos-mode flag)
//!     → WeightedPool::normal() | WeightedPool::chaos()
//!     → EndpointCatalog (pool + seedable rng), fixed for the process
//!     → select() per dispatch → EndpointClass → request path
//! ```

pub mod class;
pub mod pool;

pub use class::EndpointClass;
pub use pool::{Endpoint, EndpointCatalog, WeightedPool};
