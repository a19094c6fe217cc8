//! Global Controller Constants.
//!
//! Fixed policy values that are not part of the device configuration.

/// Age, in controller cycles, at which a queued request is considered starved.
///
/// Once the oldest undispatched request reaches this age it becomes the only
/// request that may be dispatched to a bank.
pub const QOS_AGE_THRESHOLD: u64 = 100;

/// Ratio of controller cycles to command-bus cycles.
///
/// The output arbiter only runs on cycles that are a multiple of this value.
pub const OUTPUT_CLOCK_DIVIDER: u64 = 2;

/// Consecutive rejected submissions after which backpressure is logged as a warning.
pub const BACKPRESSURE_WARN_CYCLES: u64 = 1_000;
