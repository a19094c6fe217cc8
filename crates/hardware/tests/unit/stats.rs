//! # Statistics Tests

use dramsched_core::stats::{ControllerStats, STATS_SECTIONS};

#[test]
fn fresh_stats_are_zero() {
    let s = ControllerStats::default();
    assert_eq!(s.elapsed_cycles(), 0);
    assert_eq!(s.requests_retired, 0);
    assert!(s.mean_latency().abs() < f64::EPSILON);
    assert!(s.row_hit_rate().abs() < f64::EPSILON);
}

#[test]
fn retirement_tracks_mean_and_max_latency() {
    let mut s = ControllerStats::default();
    s.record_retirement(10);
    s.record_retirement(30);
    assert_eq!(s.requests_retired, 2);
    assert_eq!(s.total_latency, 40);
    assert_eq!(s.max_latency, 30);
    assert!((s.mean_latency() - 20.0).abs() < f64::EPSILON);
}

#[test]
fn bus_wait_is_averaged_over_emitted_commands() {
    let mut s = ControllerStats::default();
    assert!(s.mean_bus_wait().abs() < f64::EPSILON);
    s.record_bus_wait(1);
    s.record_bus_wait(7);
    s.reads = 1;
    s.writes = 1;
    assert_eq!(s.bus_wait_total, 8);
    assert_eq!(s.bus_wait_max, 7);
    assert!((s.mean_bus_wait() - 4.0).abs() < f64::EPSILON);
}

#[test]
fn row_hit_rate_is_a_percentage() {
    let mut s = ControllerStats::default();
    s.row_hits = 3;
    s.row_misses = 1;
    assert!((s.row_hit_rate() - 75.0).abs() < f64::EPSILON);
}

#[test]
fn elapsed_includes_skipped_cycles() {
    let mut s = ControllerStats::default();
    s.cycles = 40;
    s.skipped_cycles = 960;
    assert_eq!(s.elapsed_cycles(), 1000);
}

#[test]
fn section_printing_accepts_every_name() {
    let s = ControllerStats::default();
    for name in STATS_SECTIONS {
        s.print_sections(&[(*name).to_string()]);
    }
    s.print();
}
