//! The engine: owns one run's configuration, canonicalization backend,
//! heartbeat, and polynomial accumulator, and exposes the high-level
//! operations a caller actually wants (diameter search, circuit synthesis).
//! Replaces the original's process-wide globals (`options.h` `#define`s plus
//! file-scope `HashSet`/`lifeBeat` statics) with one owned struct built from
//! a [`Config`] value, per the config-as-value redesign.

use cnot_core::{Matrix, Trace};

use crate::canonical::CanonicalBackend;
use crate::config::Config;
use crate::controller::{BfsController, ProgressRecord, SearchTotals, UnidirectionalResult};
use crate::error::EngineError;
use crate::heartbeat::Heartbeat;
use crate::poly::PolyAccumulator;
use crate::traceback::{trace_back_middle, TraceEndPerm};

/// The outcome of synthesizing a circuit between two matrices: the gate
/// sequence, the permutation correcting its literal endpoint onto `goal`,
/// and how deep each half of the search went.
pub struct SynthesisResult {
    pub trace: Trace,
    pub end_perm: TraceEndPerm,
    pub fwd_depth: usize,
    pub bwd_depth: usize,
    pub totals: SearchTotals,
}

/// A completed [`Engine::synthesize`] run: the per-level progress output is
/// always present, whether or not `goal` was actually reached.
pub struct SynthesisRun {
    pub progress: Vec<ProgressRecord>,
    pub found: Option<SynthesisResult>,
}

/// Owns everything one BFS run needs: configuration, canonicalizer,
/// heartbeat, and (optionally) the midpoint polynomial accumulator.
pub struct Engine {
    config: Config,
    backend: Box<dyn CanonicalBackend>,
    heartbeat: Heartbeat,
    poly: Option<PolyAccumulator>,
}

impl Engine {
    /// Build an engine from a validated configuration.
    pub fn new(config: Config) -> Result<Self, EngineError> {
        config.validate()?;
        let backend = config.build_backend();
        let heartbeat = Heartbeat::new(config.beat);
        let poly = config.poly.then(|| PolyAccumulator::new(config.n));
        Ok(Self {
            config,
            backend,
            heartbeat,
            poly,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn controller(&self) -> BfsController<'_> {
        BfsController::new(
            &self.config,
            self.backend.as_ref(),
            &self.heartbeat,
            self.poly.as_ref(),
        )
    }

    /// Run a unidirectional BFS from `start`, reporting diameter-style
    /// level-by-level growth. `goal`, if given, stops the search early once
    /// reached; `limit` caps the number of depth steps taken regardless.
    pub fn bfs(
        &self,
        start: Matrix,
        goal: Option<Matrix>,
        limit: Option<u8>,
    ) -> Result<UnidirectionalResult, EngineError> {
        self.controller().generate_bfs(start, goal, limit)
    }

    /// Find the minimum-length circuit from `start` to `goal` via
    /// meet-in-the-middle bidirectional search, then reconstruct and
    /// retarget the gate trace.
    pub fn synthesize(
        &self,
        start: Matrix,
        goal: Matrix,
        limit: Option<u8>,
    ) -> Result<SynthesisRun, EngineError> {
        let result = self.controller().bidirectional(start, goal, limit)?;
        let progress = result.progress;
        let Some(middle) = result.middle else {
            return Ok(SynthesisRun {
                progress,
                found: None,
            });
        };
        let (trace, end_perm) = trace_back_middle(
            self.config.n,
            self.backend.as_ref(),
            self.config.swap,
            start,
            middle,
            goal,
            &result.fwd_levels,
            &result.bwd_levels,
            result.fwd_depth,
            result.bwd_depth,
        )?;
        Ok(SynthesisRun {
            progress,
            found: Some(SynthesisResult {
                trace,
                end_perm,
                fwd_depth: result.fwd_depth,
                bwd_depth: result.bwd_depth,
                totals: result.totals,
            }),
        })
    }

    /// Snapshot the midpoint essential-index polynomial, if this engine was
    /// configured to accumulate it.
    pub fn poly_snapshot(&self) -> Option<Vec<u64>> {
        self.poly.as_ref().map(PolyAccumulator::snapshot)
    }
}
