//! Breadth-first search drivers: unidirectional level-by-level expansion
//! and the bidirectional meet-in-the-middle search, both built on
//! [`crate::frontier::FrontierExpander`]. Ported from `generate_bfs()` and
//! `bidirectional()` in the original driver.

use std::sync::Mutex;

use cnot_core::Matrix;

use crate::canonical::CanonicalBackend;
use crate::config::Config;
use crate::error::EngineError;
use crate::frontier::FrontierExpander;
use crate::hashset::ConcurrentOpenHashSet;
use crate::heartbeat::Heartbeat;
use crate::poly::PolyAccumulator;

/// Cumulative totals after completing a search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchTotals {
    /// Sum of orbit-weighted level sizes across all expanded depths.
    pub elements: u64,
    /// Sum of canonical-node counts across all expanded depths.
    pub orbits: u64,
}

/// Which side of a bidirectional search a [`ProgressRecord`] reports on.
/// `None` on [`UnidirectionalResult`], since there is only one side there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressSide {
    Forward,
    Backward,
}

/// One level's worth of the mandatory `Depth d (2^s): (t s) (k elts) (q
/// orbits)` progress output: the per-level counts themselves (not a running
/// total), matching `report(level, orbit)` in the original driver.
#[derive(Debug, Clone, Copy)]
pub struct ProgressRecord {
    /// Externally-reported depth is `depth - 1`; `depth` here is the
    /// 1-indexed internal level number.
    pub depth: usize,
    /// log2 bucket count of the table this level was expanded into.
    pub scale: u32,
    pub elapsed_secs: u64,
    /// Orbit-weighted size of this level alone.
    pub level: u64,
    /// Number of canonical matrices discovered at this level alone.
    pub orbits: u64,
    pub side: Option<ProgressSide>,
}

/// Outcome of a unidirectional search.
pub struct UnidirectionalResult {
    /// Depth reached (reported externally as `depth-1`, since level 1 is
    /// the start level).
    pub depth: usize,
    /// One hash table per depth, `0..=depth`; index 0 is unused filler to
    /// match the original's 1-indexed level arrays.
    pub levels: Vec<ConcurrentOpenHashSet>,
    pub totals: SearchTotals,
    /// Depth at which `goal` was found, if a goal was supplied and reached.
    pub found_at: Option<usize>,
    /// One record per completed level, in the order the levels finished.
    pub progress: Vec<ProgressRecord>,
}

/// Outcome of a bidirectional search: a meeting matrix (if found) plus how
/// deep each side went.
pub struct BidirectionalResult {
    pub middle: Option<Matrix>,
    pub fwd_depth: usize,
    pub bwd_depth: usize,
    pub fwd_levels: Vec<ConcurrentOpenHashSet>,
    pub bwd_levels: Vec<ConcurrentOpenHashSet>,
    pub totals: SearchTotals,
    /// One record per completed level on either side, in the order the
    /// levels finished.
    pub progress: Vec<ProgressRecord>,
}

/// Drives BFS expansion using a configuration's canonicalizer and table
/// sizing hints.
pub struct BfsController<'a> {
    config: &'a Config,
    backend: &'a dyn CanonicalBackend,
    heartbeat: &'a Heartbeat,
    poly: Option<&'a PolyAccumulator>,
}

impl<'a> BfsController<'a> {
    pub fn new(
        config: &'a Config,
        backend: &'a dyn CanonicalBackend,
        heartbeat: &'a Heartbeat,
        poly: Option<&'a PolyAccumulator>,
    ) -> Self {
        Self {
            config,
            backend,
            heartbeat,
            poly,
        }
    }

    fn new_table(&self, scale: u32) -> Result<ConcurrentOpenHashSet, EngineError> {
        ConcurrentOpenHashSet::with_scale(scale, self.config.probe)
    }

    fn canonical_key(&self, m: Matrix) -> Result<(u64, u64), EngineError> {
        let form = self.backend.canonicalize(m, self.config.swap)?;
        Ok((form.representative.bits(), form.orbit_size))
    }

    /// Initialize levels `[0, 1]` with `start`'s canonical form in level 1
    /// (level 0, the "prev" slot, stays empty). Returns `start`'s orbit
    /// size.
    fn init_level(
        &self,
        start: Matrix,
    ) -> Result<(ConcurrentOpenHashSet, ConcurrentOpenHashSet, u64), EngineError> {
        let prev = self.new_table(3)?;
        let current = self.new_table(3)?;
        let (key, orbit) = self.canonical_key(start)?;
        current.insert_or_contains(key)?;
        Ok((prev, current, orbit))
    }

    fn expander(&self, poly_midpoint: bool) -> FrontierExpander<'_> {
        FrontierExpander::new(
            self.backend,
            self.config.n,
            self.config.swap,
            self.poly,
            poly_midpoint,
            self.heartbeat,
        )
    }

    /// Unidirectional breadth-first search from `start`, optionally stopping
    /// early once `goal` (if given) is found, or once `limit` depth steps
    /// have been taken.
    pub fn generate_bfs(
        &self,
        start: Matrix,
        goal: Option<Matrix>,
        limit: Option<u8>,
    ) -> Result<UnidirectionalResult, EngineError> {
        let n = self.config.n;
        let poly_midpoint_depth = (n % 2 == 0).then_some(n as usize / 2 + 1);

        let (prev0, current0, orbit0) = self.init_level(start)?;
        let mut levels = vec![self.new_table(3)?, prev0, current0];
        let mut totals = SearchTotals {
            elements: orbit0,
            orbits: orbit0,
        };
        let mut depth = 1usize;
        let mut orbit = 1u64;
        let mut progress = vec![ProgressRecord {
            depth,
            scale: 3,
            elapsed_secs: self.heartbeat.elapsed_secs(),
            level: orbit0,
            orbits: orbit0,
            side: None,
        }];
        let mut found_at = goal
            .map(|goal| self.canonical_key(goal))
            .transpose()?
            .filter(|(key, _)| levels[depth].contains(*key))
            .map(|_| depth);

        while orbit > 0 && found_at.is_none() {
            if let Some(l) = limit {
                if depth - 1 == l as usize {
                    break;
                }
            }
            depth += 1;
            let scale = self.config.scale_hint(depth - 2);
            levels.push(self.new_table(scale)?);
            let is_midpoint = poly_midpoint_depth == Some(depth);
            let (prev, current, next) = split_three(&levels, depth);
            let stats = self.expander(is_midpoint).expand_level(prev, current, next)?;
            orbit = stats.count;
            totals.elements += stats.level;
            totals.orbits += stats.count;
            self.heartbeat.report(stats.level, stats.count);
            progress.push(ProgressRecord {
                depth,
                scale,
                elapsed_secs: self.heartbeat.elapsed_secs(),
                level: stats.level,
                orbits: stats.count,
                side: None,
            });

            if let Some(goal) = goal {
                let (key, _) = self.canonical_key(goal)?;
                if levels[depth].contains(key) {
                    found_at = Some(depth);
                }
            }
        }

        Ok(UnidirectionalResult {
            depth,
            levels,
            totals,
            found_at,
            progress,
        })
    }

    /// Bidirectional search: expand whichever side currently has the
    /// smaller orbit-weighted level, intersecting after every step.
    pub fn bidirectional(
        &self,
        start: Matrix,
        goal: Matrix,
        limit: Option<u8>,
    ) -> Result<BidirectionalResult, EngineError> {
        let n = self.config.n;
        let (fwd_prev, fwd_current, forbit0) = self.init_level(start)?;
        let (bwd_prev, bwd_current, borbit0) = self.init_level(goal)?;

        let mut fwd_levels = vec![self.new_table(3)?, fwd_prev, fwd_current];
        let mut bwd_levels = vec![self.new_table(3)?, bwd_prev, bwd_current];
        let mut fdepth = 1usize;
        let mut bdepth = 1usize;
        let mut forbit = forbit0;
        let mut borbit = borbit0;
        let mut totals = SearchTotals {
            elements: forbit0 + borbit0,
            orbits: 2,
        };
        let mut progress = vec![
            ProgressRecord {
                depth: fdepth,
                scale: 3,
                elapsed_secs: self.heartbeat.elapsed_secs(),
                level: forbit0,
                orbits: forbit0,
                side: Some(ProgressSide::Forward),
            },
            ProgressRecord {
                depth: bdepth,
                scale: 3,
                elapsed_secs: self.heartbeat.elapsed_secs(),
                level: borbit0,
                orbits: borbit0,
                side: Some(ProgressSide::Backward),
            },
        ];

        let mut middle = intersect(n, &fwd_levels[fdepth], &bwd_levels[bdepth]);
        let search_ceiling = 3 * (n as usize).saturating_sub(1);

        while middle.is_none() && fdepth + bdepth - 2 < search_ceiling {
            if let Some(l) = limit {
                if fdepth + bdepth - 2 == l as usize {
                    break;
                }
            }
            if forbit <= borbit {
                fdepth += 1;
                let scale = self.config.scale_hint(fdepth - 2);
                fwd_levels.push(self.new_table(scale)?);
                let (prev, current, next) = split_three(&fwd_levels, fdepth);
                let stats = self.expander(false).expand_level(prev, current, next)?;
                forbit = stats.count;
                totals.elements += stats.level;
                totals.orbits += stats.count;
                self.heartbeat.report(stats.level, stats.count);
                progress.push(ProgressRecord {
                    depth: fdepth,
                    scale,
                    elapsed_secs: self.heartbeat.elapsed_secs(),
                    level: stats.level,
                    orbits: stats.count,
                    side: Some(ProgressSide::Forward),
                });
            } else {
                bdepth += 1;
                // Deliberately sized off the forward depth (like the
                // original): the backward successor level can still be
                // larger than the forward one's, hence the higher floor.
                let raw = crate::level_sizes::hint(n, fdepth - 1, self.config.swap);
                let scale = crate::level_sizes::scale_for(raw, self.config.extra, self.config.max_scale)
                    .max(10);
                bwd_levels.push(self.new_table(scale)?);
                let (prev, current, next) = split_three(&bwd_levels, bdepth);
                let stats = self.expander(false).expand_level(prev, current, next)?;
                borbit = stats.count;
                totals.elements += stats.level;
                totals.orbits += stats.count;
                self.heartbeat.report(stats.level, stats.count);
                progress.push(ProgressRecord {
                    depth: bdepth,
                    scale,
                    elapsed_secs: self.heartbeat.elapsed_secs(),
                    level: stats.level,
                    orbits: stats.count,
                    side: Some(ProgressSide::Backward),
                });
            }
            middle = intersect(n, &fwd_levels[fdepth], &bwd_levels[bdepth]);
        }

        Ok(BidirectionalResult {
            middle,
            fwd_depth: fdepth,
            bwd_depth: bdepth,
            fwd_levels,
            bwd_levels,
            totals,
            progress,
        })
    }
}

/// Split `levels[depth-2..=depth]` into disjoint `(prev, current, next)`
/// references; `next` was just pushed and is always the last element.
fn split_three(
    levels: &[ConcurrentOpenHashSet],
    depth: usize,
) -> (&ConcurrentOpenHashSet, &ConcurrentOpenHashSet, &ConcurrentOpenHashSet) {
    let (head, tail) = levels.split_at(depth - 1);
    let prev = &head[depth - 2];
    let current = &head[depth - 1];
    let next = &tail[0];
    (prev, current, next)
}

/// Find a matrix present in both tables, if any (`intersect()` in the
/// original): a parallel scan of the smaller frontier, each worker probing
/// the larger one.
fn intersect(n: u8, a: &ConcurrentOpenHashSet, b: &ConcurrentOpenHashSet) -> Option<Matrix> {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let found: Mutex<Option<u64>> = Mutex::new(None);
    small.parallel_for_all(|key| {
        if found.lock().unwrap().is_some() {
            return;
        }
        if large.contains(key) {
            let mut slot = found.lock().unwrap();
            if slot.is_none() {
                *slot = Some(key);
            }
        }
    });
    found.into_inner().unwrap().map(|bits| Matrix::from_bits(n, bits))
}
