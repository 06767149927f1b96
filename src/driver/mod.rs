//! Load driver subsystem.
//!
//! # Data Flow
//! ```text
//! RateGovernor tick (fixed 1000/R ms cadence)
//!     → EndpointCatalog select (active pool)
//!     → chaos layer: maybe attach the force-error header
//!     → fire-and-forget dispatch (reqwest, bounded timeout)
//!     → outcome logged; completion never gates the next tick
//! ```

pub mod governor;
pub mod load;

pub use governor::RateGovernor;
pub use load::{DriverError, DriverStats, LoadDriver};
