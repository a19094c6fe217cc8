//! Builders for requests, addresses and configurations.

use dramsched_core::common::Opcode;
use dramsched_core::config::Config;
use dramsched_core::controller::queue::MemoryRequest;

/// Refresh interval long enough that no test trace reaches it.
pub const NO_REFRESH: u64 = 1_000_000;

/// Default configuration with refresh pushed out of the way.
pub fn quiet_config() -> Config {
    let mut config = Config::default();
    config.timing.refresh_interval = NO_REFRESH;
    config.timing.refresh_window = 1;
    config
}

/// Quiet configuration with the given queue capacity.
pub fn config_with_capacity(capacity: usize) -> Config {
    let mut config = quiet_config();
    config.queue.capacity = capacity;
    config
}

/// Quiet configuration with the given refresh interval and window.
pub fn config_with_refresh(interval: u64, window: u64) -> Config {
    let mut config = Config::default();
    config.timing.refresh_interval = interval;
    config.timing.refresh_window = window;
    config
}

/// Encodes coordinates with the default address layout.
///
/// Bank group bits [7:6], bank [9:8], column [17:10], row [32:18].
pub const fn addr(bank_group: u64, bank: u64, row: u64, column: u64) -> u64 {
    (row << 18) | (column << 10) | (bank << 8) | (bank_group << 6)
}

/// A read request.
pub const fn read(bank_group: u64, bank: u64, row: u64, column: u64, time: u64) -> MemoryRequest {
    MemoryRequest::new(Opcode::Read, addr(bank_group, bank, row, column), time)
}

/// A write request.
pub const fn write(bank_group: u64, bank: u64, row: u64, column: u64, time: u64) -> MemoryRequest {
    MemoryRequest::new(Opcode::Write, addr(bank_group, bank, row, column), time)
}
