//! # Request Queue Tests
//!
//! Admission rules, oldest-first views and out-of-order retirement.

use dramsched_core::controller::queue::{AdmitOutcome, RequestQueue};
use proptest::prelude::*;

use crate::common::builder::{read, write};

fn admitted(outcome: AdmitOutcome) -> u64 {
    match outcome {
        AdmitOutcome::Admitted(id) => id,
        AdmitOutcome::Pending => panic!("request was not admitted"),
    }
}

#[test]
fn empty_queue_admits_early_requests() {
    let mut q = RequestQueue::new(4);
    let id = admitted(q.try_admit(read(0, 0, 1, 0, 500), 0));
    assert_eq!(id, 0);
    assert_eq!(q.len(), 1);
    assert_eq!(q.oldest().unwrap().admitted_at, 0);
}

#[test]
fn non_empty_queue_waits_for_issue_time() {
    let mut q = RequestQueue::new(4);
    let _ = admitted(q.try_admit(read(0, 0, 1, 0, 0), 0));
    assert_eq!(q.try_admit(read(0, 1, 1, 0, 10), 9), AdmitOutcome::Pending);
    assert_eq!(q.len(), 1);
    assert_eq!(q.try_admit(read(0, 1, 1, 0, 10), 10), AdmitOutcome::Admitted(1));
}

#[test]
fn full_queue_refuses() {
    let mut q = RequestQueue::new(2);
    let _ = admitted(q.try_admit(read(0, 0, 1, 0, 0), 0));
    let _ = admitted(q.try_admit(read(0, 1, 1, 0, 0), 0));
    assert!(q.is_full());
    assert_eq!(q.try_admit(read(0, 2, 1, 0, 0), 5), AdmitOutcome::Pending);
    assert_eq!(q.len(), 2);
}

#[test]
fn ids_are_monotonic_across_retirements() {
    let mut q = RequestQueue::new(1);
    let a = admitted(q.try_admit(read(0, 0, 1, 0, 0), 0));
    let _ = q.retire(a).unwrap();
    let b = admitted(q.try_admit(read(0, 0, 1, 0, 0), 1));
    assert!(b > a);
}

#[test]
fn age_all_ages_every_entry() {
    let mut q = RequestQueue::new(4);
    let _ = admitted(q.try_admit(read(0, 0, 1, 0, 0), 0));
    q.age_all();
    let _ = admitted(q.try_admit(write(0, 1, 1, 0, 1), 1));
    q.age_all();
    let ages: Vec<u64> = q.iter().map(|e| e.age).collect();
    assert_eq!(ages, [2, 1]);
}

#[test]
fn candidates_skip_dispatched_entries() {
    let mut q = RequestQueue::new(4);
    let a = admitted(q.try_admit(read(0, 0, 1, 0, 0), 0));
    let b = admitted(q.try_admit(read(0, 1, 1, 0, 0), 0));
    assert_eq!(q.select_candidate().unwrap().id, a);
    assert!(q.mark_dispatched(a));
    assert_eq!(q.select_candidate().unwrap().id, b);
    assert!(q.mark_dispatched(b));
    assert!(q.select_candidate().is_none());
    assert!(!q.mark_dispatched(99));
}

#[test]
fn retire_oldest_advances_tail() {
    let mut q = RequestQueue::new(3);
    let a = admitted(q.try_admit(read(0, 0, 1, 0, 0), 0));
    let b = admitted(q.try_admit(read(0, 1, 1, 0, 0), 0));
    assert_eq!(q.retire(a).unwrap().id, a);
    assert_eq!(q.oldest().unwrap().id, b);
    assert_eq!(q.len(), 1);
}

#[test]
fn retire_from_middle_preserves_order() {
    let mut q = RequestQueue::new(4);
    let ids: Vec<u64> = (0..4)
        .map(|i| admitted(q.try_admit(read(0, i, 1, 0, 0), 0)))
        .collect();
    let removed = q.retire(ids[2]).unwrap();
    assert_eq!(removed.id, ids[2]);
    let left: Vec<u64> = q.iter().map(|e| e.id).collect();
    assert_eq!(left, [ids[0], ids[1], ids[3]]);

    // The freed slot is reusable and the new entry is youngest.
    let e = admitted(q.try_admit(read(1, 0, 1, 0, 0), 1));
    let left: Vec<u64> = q.iter().map(|e| e.id).collect();
    assert_eq!(left, [ids[0], ids[1], ids[3], e]);
}

#[test]
fn retire_unknown_id_is_none() {
    let mut q = RequestQueue::new(2);
    let _ = admitted(q.try_admit(read(0, 0, 1, 0, 0), 0));
    assert!(q.retire(42).is_none());
    assert_eq!(q.len(), 1);
}

#[test]
fn retired_entry_keeps_request_unchanged() {
    let mut q = RequestQueue::new(2);
    let req = write(3, 2, 0x55, 0x11, 7);
    let id = admitted(q.try_admit(req, 0));
    assert_eq!(q.get(id).unwrap().request, req);
    assert_eq!(q.retire(id).unwrap().request, req);
}

#[test]
#[should_panic(expected = "capacity must be non-zero")]
fn zero_capacity_panics() {
    let _ = RequestQueue::new(0);
}

#[derive(Clone, Debug)]
enum Op {
    Offer(u64),
    RetireNth(usize),
    Age,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..50).prop_map(Op::Offer),
        (0usize..8).prop_map(Op::RetireNth),
        Just(Op::Age),
    ]
}

proptest! {
    #[test]
    fn queue_never_exceeds_capacity_and_stays_ordered(
        capacity in 1usize..8,
        ops in prop::collection::vec(op(), 1..200),
    ) {
        let mut q = RequestQueue::new(capacity);
        let mut now = 0;
        for op in ops {
            match op {
                Op::Offer(t) => {
                    let _ = q.try_admit(read(0, 0, 1, 0, t), now);
                }
                Op::RetireNth(n) => {
                    let id = q.iter().nth(n).map(|e| e.id);
                    if let Some(id) = id {
                        prop_assert_eq!(q.retire(id).map(|e| e.id), Some(id));
                        prop_assert!(q.get(id).is_none());
                    }
                }
                Op::Age => q.age_all(),
            }
            now += 1;
            prop_assert!(q.len() <= capacity);
            prop_assert_eq!(q.iter().count(), q.len());
            let ids: Vec<u64> = q.iter().map(|e| e.id).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
            let admitted_at: Vec<u64> = q.iter().map(|e| e.admitted_at).collect();
            prop_assert!(admitted_at.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
