//! DRAM memory controller command-scheduler library.
//!
//! This crate implements a cycle-accurate model of a DDR4-style memory controller's
//! scheduling core with the following:
//! 1. **Controller:** Request queue, per-bank timing state machines, refresh timer and output arbiter.
//! 2. **Common:** Address decoding, request and command types, errors.
//! 3. **Configuration:** Queue depth, DRAM timing parameters and address layout.
//! 4. **Trace I/O:** Request sources and command sinks.
//! 5. **Simulation:** Driver loop and statistics collection.

/// Common types and constants (address mapping, commands, errors).
pub mod common;
/// Controller configuration (defaults, timing, address mapping).
pub mod config;
/// Scheduling core (queue, banks, refresh, arbiter).
pub mod controller;
/// Source/controller/sink driver.
pub mod sim;
/// Controller statistics collection and reporting.
pub mod stats;
/// Request sources and command sinks.
pub mod trace;

/// Root configuration type; use `Config::default()` or load JSON.
pub use crate::config::Config;
/// Scheduling core; construct with `MemoryController::new`.
pub use crate::controller::MemoryController;
/// Driver owning a controller, a request source and a command sink.
pub use crate::sim::Simulator;
