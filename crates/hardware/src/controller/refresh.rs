//! Refresh Controller.
//!
//! Periodically forces a refresh window during which normal output and bank
//! access are suppressed.
//! The controller alternates between two phases:
//! 1. **Interval:** `refresh_interval` cycles of normal operation.
//! 2. **Window:** `refresh_window` cycles of suppression, opened by a single REF.
//!
//! The suppression flag computed here is read by the output arbiter and the
//! bank phases on the following cycle, so a window of `n` cycles blocks exactly
//! `n` cycles.

/// Refresh timer state.
#[derive(Clone, Debug)]
pub struct RefreshController {
    interval: u64,
    window: u64,
    interval_remaining: u64,
    window_remaining: u64,
    suppressing: bool,
}

impl RefreshController {
    /// Creates a refresh controller at the start of an interval.
    ///
    /// # Arguments
    ///
    /// * `interval` - Unsuppressed cycles between windows (at least 1).
    /// * `window` - Suppressed cycles per window (at least 1).
    pub fn new(interval: u64, window: u64) -> Self {
        let interval = interval.max(1);
        Self {
            interval,
            window: window.max(1),
            interval_remaining: interval,
            window_remaining: 0,
            suppressing: false,
        }
    }

    /// Advances the timers by one cycle.
    ///
    /// # Returns
    ///
    /// `true` when a refresh window opens this cycle and a REF must be recorded.
    pub fn tick(&mut self) -> bool {
        if self.window_remaining > 0 {
            self.window_remaining -= 1;
            if self.window_remaining == 0 {
                // The closing cycle is the first unsuppressed cycle of the next interval.
                self.interval_remaining = self.interval - 1;
                self.suppressing = false;
            }
            return false;
        }

        if self.interval_remaining > 0 {
            self.interval_remaining -= 1;
            self.suppressing = false;
            return false;
        }

        self.window_remaining = self.window;
        self.suppressing = true;
        true
    }

    /// True while normal output must be withheld.
    #[inline]
    pub const fn is_suppressing(&self) -> bool {
        self.suppressing
    }

    /// Cycles that can elapse before the next window opens.
    ///
    /// Zero while a window is in progress or opens on the next tick.
    pub const fn cycles_until_window(&self) -> u64 {
        if self.window_remaining > 0 {
            0
        } else {
            self.interval_remaining
        }
    }

    /// Consumes `cycles` quiet cycles of the current interval without ticking.
    ///
    /// `cycles` is clamped to [`Self::cycles_until_window`], so a skip never
    /// swallows a refresh.
    ///
    /// # Returns
    ///
    /// The number of cycles actually skipped.
    pub fn skip(&mut self, cycles: u64) -> u64 {
        let n = cycles.min(self.cycles_until_window());
        self.interval_remaining -= n;
        n
    }

    /// Configured interval length.
    pub const fn interval(&self) -> u64 {
        self.interval
    }

    /// Configured window length.
    pub const fn window(&self) -> u64 {
        self.window
    }
}
