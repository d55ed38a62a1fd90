//! Path reconstruction: given the saved frontiers of a (possibly
//! bidirectional) search and a meeting matrix, walk the levels backward to
//! recover the actual `cx` gates, then re-permute the recovered trace so it
//! applies to the caller's real start/goal matrices rather than their
//! canonical representatives. Ported from `step_back()`/`trace_back()`/
//! `trace_back_middle()` in the original.

use cnot_core::{Gate, Matrix, Permutation, Trace};

use crate::canonical::{CanonicalBackend, CanonicalPerm};
use crate::error::EngineError;
use crate::hashset::ConcurrentOpenHashSet;

/// Find the canonical predecessor of `x` one level down, recording the gate
/// that reaches `x` from it.
fn step_back(
    n: u8,
    backend: &dyn CanonicalBackend,
    swap: bool,
    x: Matrix,
    level: &ConcurrentOpenHashSet,
) -> Result<(Matrix, Gate), EngineError> {
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let prev = x.cnot(i, j); // cx is its own inverse
            let form = backend.canonicalize(prev, swap)?;
            if level.contains(form.representative.bits()) {
                return Ok((prev, Gate { i, j }));
            }
        }
    }
    Err(EngineError::Invariant {
        reason: "predecessor not found during trace-back".to_string(),
    })
}

/// Walk `goal` back through `levels[1..depth]`, accumulating gates in
/// forward-to-backward order (caller reverses as needed).
fn trace_back(
    n: u8,
    backend: &dyn CanonicalBackend,
    swap: bool,
    mut current: Matrix,
    levels: &[ConcurrentOpenHashSet],
    depth: usize,
) -> Result<(Matrix, Trace), EngineError> {
    let mut gates = Vec::new();
    for d in (1..depth).rev() {
        let (prev, gate) = step_back(n, backend, swap, current, &levels[d])?;
        gates.push(gate);
        current = prev;
    }
    Ok((current, Trace(gates)))
}

/// Full trace-back for a bidirectional search that met at `middle`:
/// reconstructs the gate sequence from `start` to `goal`.
pub fn trace_back_middle(
    n: u8,
    backend: &dyn CanonicalBackend,
    swap: bool,
    start: Matrix,
    middle: Matrix,
    goal: Matrix,
    fwd_levels: &[ConcurrentOpenHashSet],
    bwd_levels: &[ConcurrentOpenHashSet],
    fdepth: usize,
    bdepth: usize,
) -> Result<(Trace, TraceEndPerm), EngineError> {
    let (start_found, mut fwd_trace) = trace_back(n, backend, swap, middle, fwd_levels, fdepth)?;
    let (goal_found, bwd_trace) = trace_back(n, backend, swap, middle, bwd_levels, bdepth)?;

    fwd_trace.reverse();
    fwd_trace.extend(bwd_trace);
    // fwd_trace now runs from `start_found` to `goal_found`, both canonical
    // representatives reachable from `start`/`goal` respectively.

    let start_form = backend.canonicalize(start, swap)?;
    let start_found_form = backend.canonicalize(start_found, swap)?;
    let goal_form = backend.canonicalize(goal, swap)?;
    let goal_found_form = backend.canonicalize(goal_found, swap)?;

    match (
        start_form.perm,
        start_found_form.perm,
        goal_form.perm,
        goal_found_form.perm,
    ) {
        (
            CanonicalPerm::Single(a_start),
            CanonicalPerm::Single(b_start),
            CanonicalPerm::Single(a_goal),
            CanonicalPerm::Single(b_goal),
        ) => {
            // q carries `start` onto `start_found` (both reach the same
            // representative): q = b_start^-1 . a_start. Relabeling the
            // trace's gates by q carries its replay from `start_found` to
            // `start` (see DESIGN.md for the equivariance this relies on).
            let q = b_start.inverse().compose(&a_start);
            let retargeted = fwd_trace.permute(&q);

            // m carries `goal` onto `goal_found` the same way; pi_final
            // then carries the retargeted trace's actual endpoint
            // (`goal_found` permuted by `q^-1`) onto the literal `goal`.
            let m = b_goal.inverse().compose(&a_goal);
            let pi_final = m.inverse().compose(&q);
            Ok((retargeted, TraceEndPerm::Single(pi_final)))
        }
        (
            CanonicalPerm::RowCol(sigma_a_start, tau_a_start),
            CanonicalPerm::RowCol(sigma_b_start, tau_b_start),
            CanonicalPerm::RowCol(sigma_a_goal, tau_a_goal),
            CanonicalPerm::RowCol(sigma_b_goal, tau_b_goal),
        ) => {
            // Gates only carry row indices (`cx i,j` always refers to
            // rows), so only the row permutation retargets the trace; the
            // column permutation only ever shows up in the final state
            // correction.
            let sigma_q = sigma_b_start.inverse().compose(&sigma_a_start);
            let retargeted = fwd_trace.permute(&sigma_q);

            let sigma_m = sigma_b_goal.inverse().compose(&sigma_a_goal);
            let tau_m = tau_b_goal.inverse().compose(&tau_a_goal);
            let sigma_pi = sigma_m.inverse().compose(&sigma_q);
            let tau_pi = tau_m.inverse().compose(&tau_b_start.inverse().compose(&tau_a_start));
            Ok((retargeted, TraceEndPerm::RowCol(sigma_pi, tau_pi)))
        }
        _ => Err(EngineError::Invariant {
            reason: "mismatched canonicalization regimes between start and goal".to_string(),
        }),
    }
}

/// The permutation(s) needed to map a replayed trace's actual endpoint onto
/// the caller's real goal matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEndPerm {
    Single(Permutation),
    RowCol(Permutation, Permutation),
}
