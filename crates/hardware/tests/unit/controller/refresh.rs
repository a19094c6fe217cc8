//! # Refresh Timer Tests

use dramsched_core::controller::refresh::RefreshController;
use proptest::prelude::*;

/// Ticks `cycles` times, returning (cycle, opened, suppressing-after-tick).
fn timeline(r: &mut RefreshController, cycles: u64) -> Vec<(u64, bool, bool)> {
    (0..cycles)
        .map(|c| {
            let opened = r.tick();
            (c, opened, r.is_suppressing())
        })
        .collect()
}

#[test]
fn windows_open_every_interval_plus_window() {
    let mut r = RefreshController::new(10, 3);
    let t = timeline(&mut r, 40);
    let opens: Vec<u64> = t.iter().filter(|e| e.1).map(|e| e.0).collect();
    assert_eq!(opens, [10, 23, 36]);
    let suppressed: Vec<u64> = t.iter().filter(|e| e.2).map(|e| e.0).collect();
    assert_eq!(suppressed, [10, 11, 12, 23, 24, 25, 36, 37, 38]);
}

#[test]
fn cycles_until_window_counts_down() {
    let mut r = RefreshController::new(5, 2);
    assert_eq!(r.cycles_until_window(), 5);
    assert!(!r.tick());
    assert_eq!(r.cycles_until_window(), 4);
    for _ in 0..4 {
        assert!(!r.tick());
    }
    assert_eq!(r.cycles_until_window(), 0);
    assert!(r.tick());
    assert_eq!(r.cycles_until_window(), 0);
}

#[test]
fn skip_is_clamped_to_next_window() {
    let mut r = RefreshController::new(100, 5);
    assert_eq!(r.skip(40), 40);
    assert_eq!(r.cycles_until_window(), 60);
    assert_eq!(r.skip(500), 60);
    assert_eq!(r.skip(1), 0);
    assert!(r.tick());
    assert_eq!(r.skip(10), 0);
}

#[test]
fn skipping_keeps_the_refresh_schedule() {
    let mut plain = RefreshController::new(10, 3);
    let mut skipped = RefreshController::new(10, 3);
    let plain_opens: Vec<u64> = (0..60).filter(|_| plain.tick()).collect();

    let mut opens = Vec::new();
    let mut cycle = 0;
    while cycle < 60 {
        cycle += skipped.skip(7);
        if cycle >= 60 {
            break;
        }
        if skipped.tick() {
            opens.push(cycle);
        }
        cycle += 1;
    }
    assert_eq!(opens, plain_opens);
}

#[test]
fn zero_parameters_are_clamped() {
    let r = RefreshController::new(0, 0);
    assert_eq!(r.interval(), 1);
    assert_eq!(r.window(), 1);
}

proptest! {
    #[test]
    fn exactly_one_ref_per_window(interval in 1u64..40, window in 1u64..20) {
        let mut r = RefreshController::new(interval, window);
        let period = interval + window;
        let cycles = period * 5;
        let t = timeline(&mut r, cycles);
        let opens = t.iter().filter(|e| e.1).count() as u64;
        prop_assert_eq!(opens, 5);
        let suppressed = t.iter().filter(|e| e.2).count() as u64;
        prop_assert_eq!(suppressed, window * 5);
    }
}
