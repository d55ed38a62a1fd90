//! Immutable run configuration, built once from CLI flags and handed to
//! [`crate::engine::Engine`]. Replaces the original's compile-time `#define`
//! constants (`N`, `E`, `MAX`, `SWAP`, `NAUTY`, `POLY`, `BEAT` in
//! `options.h`) with ordinary runtime fields, per the redesign that treats
//! dimension and feature selection as values rather than template
//! parameters.

use crate::error::EngineError;

/// Which canonicalization backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Pure combinatorial fingerprint/orbit search ([`crate::canonical::fingerprint`]).
    Fingerprint,
    /// Bipartite-graph degree refinement ([`crate::canonical::graph`]).
    Graph,
}

/// Immutable engine configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Matrix dimension, `1..=8`.
    pub n: u8,
    /// Extra bits added on top of the level-size hint when sizing a hash
    /// table (`E` in the original).
    pub extra: u8,
    /// Maximum table scale (`MAX`): `log2` bucket-count ceiling.
    pub max_scale: u8,
    /// Independent row/column permutations ("free swap gates").
    pub swap: bool,
    /// Canonicalization backend.
    pub backend: Backend,
    /// Accumulate the midpoint essential-index polynomial. Incompatible
    /// with `swap` (mirrors the original's `POLY==1 && SWAP==1` guard).
    pub poly: bool,
    /// Heartbeat interval in seconds; `0` disables it.
    pub beat: u64,
    /// Hash table probe strategy.
    pub probe: crate::hashset::ProbeStrategy,
}

impl Config {
    /// Defaults matching the original's `options.h` `#ifndef` fallbacks:
    /// `N=6, E=1, MAX=34, SWAP=0, POLY=0, BEAT=0`, `Backend::Graph` (the
    /// runtime equivalent of the original defaulting to `NAUTY=1`).
    pub fn new(n: u8) -> Self {
        Self {
            n,
            extra: 1,
            max_scale: 34,
            swap: false,
            backend: Backend::Graph,
            poly: false,
            beat: 0,
            probe: crate::hashset::ProbeStrategy::Linear,
        }
    }

    /// Reject configurations the engine cannot run, mirroring `main()`'s own
    /// startup checks (`N` range, `POLY && SWAP`).
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(1..=8).contains(&self.n) {
            return Err(EngineError::Config {
                reason: format!("N={} not supported, only N=1..8", self.n),
            });
        }
        if self.poly && self.swap {
            return Err(EngineError::Config {
                reason: "polynomial coefficients are not supported with swap".to_string(),
            });
        }
        if self.swap && self.backend == Backend::Fingerprint {
            return Err(EngineError::Config {
                reason: "the fingerprint backend does not support swap; select the graph backend"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Build the canonicalizer this configuration selects.
    pub fn build_backend(&self) -> Box<dyn crate::canonical::CanonicalBackend> {
        match self.backend {
            Backend::Fingerprint => Box::new(crate::canonical::fingerprint::FingerprintBackend),
            Backend::Graph => Box::new(crate::canonical::graph::GraphBackend),
        }
    }

    /// Table scale hint for BFS depth `depth` (levelSizes lookup + clamp).
    pub fn scale_hint(&self, depth: usize) -> u32 {
        let raw = crate::level_sizes::hint(self.n, depth, self.swap);
        crate::level_sizes::scale_for(raw, self.extra, self.max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::new(6).validate().unwrap();
    }

    #[test]
    fn rejects_dimension_out_of_range() {
        let mut cfg = Config::new(6);
        cfg.n = 9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_poly_with_swap() {
        let mut cfg = Config::new(6);
        cfg.swap = true;
        cfg.poly = true;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_fingerprint_backend_with_swap() {
        let mut cfg = Config::new(6);
        cfg.swap = true;
        cfg.backend = Backend::Fingerprint;
        assert!(cfg.validate().is_err());
    }
}
