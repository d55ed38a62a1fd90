//! Stress tests for the concurrent hash set under many writer threads,
//! checking the "exactly one winner" invariant directly rather than
//! trusting each thread's own return value alone.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cnot_engine::hashset::{ConcurrentOpenHashSet, ProbeStrategy};

fn stress(probe: ProbeStrategy, threads: usize, keys_per_thread: u64, scale: u32) {
    let set = Arc::new(ConcurrentOpenHashSet::with_scale(scale, probe).unwrap());
    let winners = Arc::new(AtomicUsize::new(0));

    std::thread::scope(|scope| {
        for t in 0..threads as u64 {
            let set = Arc::clone(&set);
            let winners = Arc::clone(&winners);
            scope.spawn(move || {
                for k in 0..keys_per_thread {
                    // Every thread races to insert the SAME shared key set
                    // (not disjoint ranges), so collisions are guaranteed.
                    let key = k + 1;
                    if set.insert_or_contains(key).unwrap() {
                        winners.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });

    assert_eq!(
        winners.load(Ordering::Relaxed) as u64,
        keys_per_thread,
        "exactly one thread should observe is_new=true per key"
    );
    assert_eq!(set.len() as u64, keys_per_thread);
    for k in 1..=keys_per_thread {
        assert!(set.contains(k), "key {k} missing after concurrent inserts");
    }
}

#[test]
fn linear_probe_exactly_one_winner_per_key() {
    stress(ProbeStrategy::Linear, 8, 2000, 14);
}

#[test]
fn quad_linear_probe_exactly_one_winner_per_key() {
    stress(ProbeStrategy::QuadLinear, 8, 2000, 14);
}

#[test]
fn heavily_loaded_table_still_finds_every_key() {
    // Scale 10 holds 1024 buckets; loading ~900 keys forces long probe
    // chains without tripping the capacity error.
    let set = ConcurrentOpenHashSet::with_scale(10, ProbeStrategy::Linear).unwrap();
    for k in 1..=900u64 {
        set.insert_or_contains(k).unwrap();
    }
    for k in 1..=900u64 {
        assert!(set.contains(k));
    }
    assert_eq!(set.len(), 900);
}

#[test]
fn full_table_reports_capacity_error_instead_of_hanging() {
    let set = ConcurrentOpenHashSet::with_scale(4, ProbeStrategy::Linear).unwrap();
    let mut first_failure = None;
    for k in 1..=100u64 {
        if let Err(e) = set.insert_or_contains(k) {
            first_failure = Some(e);
            break;
        }
    }
    assert!(first_failure.is_some(), "16-bucket table must eventually reject an insert");
}
