//! Expansion of one BFS level into the next: for every matrix in the
//! current frontier, apply every `cx[i,j]` rewrite, canonicalize the
//! result, and insert it into the next frontier if it is new. Ported from
//! `Add()`/`next_level()` in the original driver, restructured as a
//! bulk-parallel rayon pass over the current frontier's hash table instead
//! of an OpenMP `parallelForAll` loop.

use std::sync::atomic::{AtomicU64, Ordering};

use cnot_core::Matrix;

use crate::canonical::CanonicalBackend;
use crate::error::EngineError;
use crate::hashset::ConcurrentOpenHashSet;
use crate::heartbeat::Heartbeat;
use crate::poly::PolyAccumulator;

/// Orbit-weighted size and raw node count contributed by one expansion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionStats {
    /// Sum of orbit sizes of newly discovered canonical matrices.
    pub level: u64,
    /// Number of newly discovered canonical matrices.
    pub count: u64,
}

/// Drives one frontier-to-frontier expansion step.
pub struct FrontierExpander<'a> {
    backend: &'a dyn CanonicalBackend,
    n: u8,
    swap: bool,
    poly: Option<&'a PolyAccumulator>,
    poly_midpoint: bool,
    heartbeat: &'a Heartbeat,
}

impl<'a> FrontierExpander<'a> {
    /// `poly_midpoint` mirrors the original's `2*(depth-1)==N` check: only
    /// the level that lands exactly on the midpoint distance contributes to
    /// the polynomial accumulator.
    pub fn new(
        backend: &'a dyn CanonicalBackend,
        n: u8,
        swap: bool,
        poly: Option<&'a PolyAccumulator>,
        poly_midpoint: bool,
        heartbeat: &'a Heartbeat,
    ) -> Self {
        Self {
            backend,
            n,
            swap,
            poly,
            poly_midpoint,
            heartbeat,
        }
    }

    /// Expand `current` into `next`, skipping anything already present in
    /// `prev` or `current` (the undirected-graph BFS no-revisit rule).
    pub fn expand_level(
        &self,
        prev: &ConcurrentOpenHashSet,
        current: &ConcurrentOpenHashSet,
        next: &ConcurrentOpenHashSet,
    ) -> Result<ExpansionStats, EngineError> {
        let level = AtomicU64::new(0);
        let count = AtomicU64::new(0);

        current.try_parallel_for_all(|bits| -> Result<(), EngineError> {
            let x = Matrix::from_bits(self.n, bits);
            let mut loc_level = 0u64;
            let mut loc_count = 0u64;
            for i in 0..self.n {
                for j in 0..self.n {
                    if i == j {
                        continue;
                    }
                    let y = x.cnot(i, j);
                    let form = self.backend.canonicalize(y, self.swap)?;
                    let key = form.representative.bits();
                    if prev.contains(key) || current.contains(key) {
                        continue;
                    }
                    if next.insert_or_contains(key)? {
                        loc_level += form.orbit_size;
                        loc_count += 1;
                        if let (Some(poly), true) = (self.poly, self.poly_midpoint) {
                            let essential = form.representative.count_essential();
                            poly.record(self.n, essential, form.orbit_size);
                        }
                    }
                }
            }
            if loc_level > 0 {
                level.fetch_add(loc_level, Ordering::Relaxed);
                count.fetch_add(loc_count, Ordering::Relaxed);
            }
            self.heartbeat.maybe_beat(0, loc_level, loc_count);
            Ok(())
        })?;

        Ok(ExpansionStats {
            level: level.load(Ordering::Relaxed),
            count: count.load(Ordering::Relaxed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::fingerprint::FingerprintBackend;
    use crate::hashset::ProbeStrategy;

    #[test]
    fn expands_identity_to_its_neighbors() {
        let backend = FingerprintBackend;
        let heartbeat = Heartbeat::new(0);
        let expander = FrontierExpander::new(&backend, 3, false, None, false, &heartbeat);

        let prev = ConcurrentOpenHashSet::with_scale(4, ProbeStrategy::Linear).unwrap();
        let current = ConcurrentOpenHashSet::with_scale(4, ProbeStrategy::Linear).unwrap();
        let next = ConcurrentOpenHashSet::with_scale(4, ProbeStrategy::Linear).unwrap();

        let id = Matrix::identity(3);
        let canon = backend.canonicalize(id, false).unwrap();
        current.insert_or_contains(canon.representative.bits()).unwrap();

        let stats = expander.expand_level(&prev, &current, &next).unwrap();
        assert!(stats.count > 0);
        assert!(!next.is_empty());
    }

    #[test]
    fn does_not_revisit_prev_or_current() {
        let backend = FingerprintBackend;
        let heartbeat = Heartbeat::new(0);
        let expander = FrontierExpander::new(&backend, 3, false, None, false, &heartbeat);

        let id = Matrix::identity(3);
        let canon_id = backend.canonicalize(id, false).unwrap();
        let one_step = id.cnot(0, 1);
        let canon_one = backend.canonicalize(one_step, false).unwrap();

        let prev = ConcurrentOpenHashSet::with_scale(4, ProbeStrategy::Linear).unwrap();
        prev.insert_or_contains(canon_id.representative.bits()).unwrap();
        let current = ConcurrentOpenHashSet::with_scale(4, ProbeStrategy::Linear).unwrap();
        current.insert_or_contains(canon_one.representative.bits()).unwrap();
        let next = ConcurrentOpenHashSet::with_scale(4, ProbeStrategy::Linear).unwrap();

        let stats = expander.expand_level(&prev, &current, &next).unwrap();
        // one_step's neighbors include the identity, which must be filtered
        // out since it's in `prev`.
        assert!(!next.contains(canon_id.representative.bits()));
        assert!(stats.count > 0);
    }
}
