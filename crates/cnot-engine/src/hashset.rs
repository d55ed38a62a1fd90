//! A lock-free, open-addressed set of non-zero `u64` keys, backed by a
//! demand-paged anonymous memory mapping so a table can be sized for the
//! worst case without paying for pages it never touches.
//!
//! Grounded on the original `HashSet<TO_TYPE, BUCKETFINDER, HASH>` template:
//! the zero key doubles as "empty slot", insertion is a single
//! compare-and-swap loop per probe, and the probe sequence itself is
//! pluggable. The atomic discipline (Relaxed loads, Release on the winning
//! CAS) mirrors the transposition table's lock-free bucket table.
//!
//! Slot *index* 0 is reserved the same way key 0 is: a probe that lands on
//! index 0 is skipped rather than read or written, so it can never be
//! confused with "freshly zeroed and unused" when a caller reads a slot back
//! by index.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use memmap2::MmapMut;
use rayon::prelude::*;

use crate::error::EngineError;

/// Probe sequence used to resolve collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStrategy {
    /// Step by `+1` slot each probe.
    Linear,
    /// Stay within an 8-slot-aligned block, then jump by the block stride —
    /// keeps a whole cache line warm before spilling to the next one.
    QuadLinear,
}

impl ProbeStrategy {
    #[inline]
    fn probe(self, start: u64, step: u64, mask: u64) -> u64 {
        match self {
            ProbeStrategy::Linear => (start + step) & mask,
            ProbeStrategy::QuadLinear => {
                const BLOCK: u64 = 8;
                let block_start = start & !(BLOCK - 1);
                let within = (start + step) & (BLOCK - 1);
                if within != 0 {
                    block_start | within
                } else {
                    (block_start + BLOCK * (step / BLOCK + 1)) & mask
                }
            }
        }
    }
}

/// Slot 0 is never used for storage: it would be indistinguishable from an
/// empty slot when read back, so the original reserves it the same way it
/// reserves key 0. Bump a computed index of 0 to 1.
#[inline]
fn first_nonzero_slot(index: u64) -> u64 {
    index + (index == 0) as u64
}

/// 64-bit finalizer mix (murmur-style), used to spread packed matrix keys
/// across buckets. `mix(0)` is never consulted: callers never store the
/// zero key, since zero is the reserved empty-slot sentinel.
#[inline]
fn mix(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^= k >> 33;
    k
}

/// A concurrent set of non-zero `u64` keys with a fixed bucket count.
///
/// `insert` is safe to call from many threads at once; growth is not
/// supported — callers size the table up front via [`ConcurrentOpenHashSet::with_scale`].
pub struct ConcurrentOpenHashSet {
    slots: MmapMut,
    mask: u64,
    scale: u32,
    probe: ProbeStrategy,
    len: AtomicUsize,
}

impl ConcurrentOpenHashSet {
    /// Allocate a table with `1 << scale` buckets via an anonymous,
    /// demand-paged mapping: physical memory is only committed to the pages
    /// a probe sequence actually touches.
    pub fn with_scale(scale: u32, probe: ProbeStrategy) -> Result<Self, EngineError> {
        let buckets = 1u64 << scale;
        let bytes = buckets as usize * std::mem::size_of::<u64>();
        let slots = MmapMut::map_anon(bytes).map_err(|e| EngineError::Config {
            reason: format!("failed to map {bytes} bytes for hash table: {e}"),
        })?;
        Ok(Self {
            slots,
            mask: buckets - 1,
            scale,
            probe,
            len: AtomicUsize::new(0),
        })
    }

    /// Bucket count.
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.mask + 1
    }

    /// log2 of the bucket count.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Number of keys currently stored (approximate under concurrent writers,
    /// exact once all writers have quiesced).
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn slot(&self, index: u64) -> &AtomicU64 {
        debug_assert!(index <= self.mask);
        // SAFETY: the mapping is `buckets * 8` bytes, `AtomicU64` has the
        // same size/layout as `u64`, and `index <= mask` keeps us in range.
        // The mapping is exclusively owned by `self` for its lifetime.
        unsafe {
            let base = self.slots.as_ptr() as *const AtomicU64;
            &*base.add(index as usize)
        }
    }

    /// Probe for `key`, inserting it if absent. Returns `Ok(true)` if this
    /// call performed the insertion, `Ok(false)` if the key was already
    /// present, and `Err` if the whole table was probed without success.
    pub fn insert_or_contains(&self, key: u64) -> Result<bool, EngineError> {
        debug_assert_ne!(key, 0, "zero is the reserved empty-slot sentinel");
        let start = first_nonzero_slot(mix(key) & self.mask);
        let mut step = 0u64;
        loop {
            let index = self.probe.probe(start, step, self.mask);
            if index != 0 {
                let slot = self.slot(index);
                let current = slot.load(Ordering::Relaxed);
                if current == key {
                    return Ok(false);
                }
                if current == 0 {
                    match slot.compare_exchange(0, key, Ordering::Release, Ordering::Relaxed) {
                        Ok(_) => {
                            self.len.fetch_add(1, Ordering::Relaxed);
                            return Ok(true);
                        }
                        Err(observed) => {
                            if observed == key {
                                return Ok(false);
                            }
                            // Lost the race to a different key; keep probing
                            // from the same slot without advancing `step`.
                            continue;
                        }
                    }
                }
            }
            step += 1;
            if step > self.mask {
                return Err(EngineError::Capacity {
                    scale: self.scale,
                    buckets: self.capacity(),
                });
            }
        }
    }

    /// Probe for `key` without inserting.
    pub fn contains(&self, key: u64) -> bool {
        debug_assert_ne!(key, 0);
        let start = first_nonzero_slot(mix(key) & self.mask);
        let mut step = 0u64;
        loop {
            let index = self.probe.probe(start, step, self.mask);
            if index != 0 {
                let current = self.slot(index).load(Ordering::Relaxed);
                if current == key {
                    return true;
                }
                if current == 0 {
                    return false;
                }
            }
            step += 1;
            if step > self.mask {
                return false;
            }
        }
    }

    /// Visit every occupied slot, single-threaded.
    pub fn for_all(&self, mut f: impl FnMut(u64)) {
        for i in 0..=self.mask {
            let key = self.slot(i).load(Ordering::Relaxed);
            if key != 0 {
                f(key);
            }
        }
    }

    /// Visit every occupied slot, splitting the bucket range across rayon's
    /// pool. `f` must tolerate being called from any worker thread.
    pub fn parallel_for_all(&self, f: impl Fn(u64) + Sync) {
        (0..=self.mask).into_par_iter().for_each(|i| {
            let key = self.slot(i).load(Ordering::Relaxed);
            if key != 0 {
                f(key);
            }
        });
    }

    /// Visit every occupied slot in parallel, short-circuiting as soon as
    /// `f` returns an error (rayon's `try_for_each` stops dispatching new
    /// work once any call fails, though in-flight calls on other threads may
    /// still complete).
    pub fn try_parallel_for_all<E: Send>(&self, f: impl Fn(u64) -> Result<(), E> + Sync) -> Result<(), E> {
        (0..=self.mask).into_par_iter().try_for_each(|i| {
            let key = self.slot(i).load(Ordering::Relaxed);
            if key != 0 {
                f(key)
            } else {
                Ok(())
            }
        })
    }
}

// SAFETY: all access goes through `AtomicU64` operations on the mapping;
// no interior mutability bypasses atomics.
unsafe impl Sync for ConcurrentOpenHashSet {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_contains() {
        let set = ConcurrentOpenHashSet::with_scale(8, ProbeStrategy::Linear).unwrap();
        assert!(set.insert_or_contains(42).unwrap());
        assert!(set.contains(42));
        assert!(!set.contains(43));
    }

    #[test]
    fn reinsert_reports_already_present() {
        let set = ConcurrentOpenHashSet::with_scale(8, ProbeStrategy::Linear).unwrap();
        assert!(set.insert_or_contains(7).unwrap());
        assert!(!set.insert_or_contains(7).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn quad_linear_also_roundtrips() {
        let set = ConcurrentOpenHashSet::with_scale(6, ProbeStrategy::QuadLinear).unwrap();
        for k in 1..100u64 {
            set.insert_or_contains(k).unwrap();
        }
        for k in 1..100u64 {
            assert!(set.contains(k), "missing key {k}");
        }
    }

    #[test]
    fn for_all_visits_every_key() {
        let set = ConcurrentOpenHashSet::with_scale(6, ProbeStrategy::Linear).unwrap();
        let keys: Vec<u64> = vec![1, 2, 3, 100, 999];
        for &k in &keys {
            set.insert_or_contains(k).unwrap();
        }
        let mut seen = Vec::new();
        set.for_all(|k| seen.push(k));
        seen.sort_unstable();
        let mut expected = keys.clone();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn slot_zero_is_never_used_for_storage() {
        let set = ConcurrentOpenHashSet::with_scale(8, ProbeStrategy::Linear).unwrap();
        for k in 1..200u64 {
            set.insert_or_contains(k).unwrap();
        }
        assert_eq!(set.slot(0).load(Ordering::Relaxed), 0);
    }

    #[test]
    fn concurrent_inserts_no_panics() {
        let set = ConcurrentOpenHashSet::with_scale(12, ProbeStrategy::Linear).unwrap();
        std::thread::scope(|scope| {
            for t in 0..4u64 {
                let set = &set;
                scope.spawn(move || {
                    for k in 1..500u64 {
                        let _ = set.insert_or_contains(k * 4 + t + 1);
                    }
                });
            }
        });
        assert_eq!(set.len(), 4 * 499);
    }

    #[test]
    fn capacity_error_when_table_is_full() {
        let set = ConcurrentOpenHashSet::with_scale(3, ProbeStrategy::Linear).unwrap();
        for k in 1..=8u64 {
            let _ = set.insert_or_contains(k);
        }
        // table has 8 buckets; 8 distinct non-zero keys may already exhaust it
        let res = set.insert_or_contains(999);
        if set.len() as u64 == set.capacity() {
            assert!(matches!(res, Err(EngineError::Capacity { .. })));
        }
    }
}
