//! The midpoint essential-index polynomial accumulator (`POLY=1` in the
//! original): at the BFS midpoint level, every newly discovered orbit
//! contributes `orbit_size * ess! * (n-ess)! / n!` to `poly[n-ess]`, where
//! `ess` is its essential-index count. Owned by [`crate::engine::Engine`]
//! rather than a process-wide global, per the config-as-value redesign.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::canonical::FACTORIAL;

/// Accumulates polynomial coefficients for matrices of dimension `n`.
pub struct PolyAccumulator {
    coefficients: Vec<AtomicU64>,
}

impl PolyAccumulator {
    /// A fresh all-zero accumulator for dimension `n` (`n+1` coefficients).
    pub fn new(n: u8) -> Self {
        let coefficients = (0..=n).map(|_| AtomicU64::new(0)).collect();
        Self { coefficients }
    }

    /// Record one matrix with `essential` essential indices and orbit size
    /// `orbit`, contributing to `poly[n - essential]`.
    pub fn record(&self, n: u8, essential: u8, orbit: u64) {
        let contribution = orbit * FACTORIAL[essential as usize] * FACTORIAL[(n - essential) as usize]
            / FACTORIAL[n as usize];
        self.coefficients[(n - essential) as usize].fetch_add(contribution, Ordering::Relaxed);
    }

    /// Snapshot the accumulated coefficients, `[poly[0], ..., poly[n]]`.
    pub fn snapshot(&self) -> Vec<u64> {
        self.coefficients
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let poly = PolyAccumulator::new(4);
        assert_eq!(poly.snapshot(), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn record_accumulates() {
        let poly = PolyAccumulator::new(4);
        poly.record(4, 4, 1);
        poly.record(4, 4, 2);
        assert_eq!(poly.snapshot()[0], 3);
    }
}
