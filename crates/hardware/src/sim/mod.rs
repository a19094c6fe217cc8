//! Simulation driver.
//!
//! Connects a request source and a command sink to the controller and runs
//! cycles until the source is exhausted and every request has retired.

/// Source/controller/sink driver loop.
pub mod simulator;

pub use simulator::Simulator;
