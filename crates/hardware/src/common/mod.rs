//! Common utilities and types shared by every controller component.
//!
//! This module provides the fundamental building blocks of the model. It includes:
//! 1. **Address Decoding:** Bit-field mapping from physical addresses to DRAM coordinates.
//! 2. **Constants:** Fixed policy values (QoS age threshold, output clock divider).
//! 3. **Requests and Commands:** Request opcodes and physical DRAM commands.
//! 4. **Error Handling:** Configuration, trace and simulation error types.

/// Address bit fields and DRAM coordinate decoding.
pub mod addr;

/// Controller-wide constants.
pub mod constants;

/// Request opcodes and DRAM command definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{AddressField, AddressMapping, DramAddress};
pub use constants::{OUTPUT_CLOCK_DIVIDER, QOS_AGE_THRESHOLD};
pub use data::{DramCommand, Opcode};
pub use error::{ConfigError, SimError, TraceError};
