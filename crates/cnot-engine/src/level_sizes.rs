//! Precalculated log2 bucket-count hints per (N, depth), ported from the
//! original `matrix_cnot.cpp`. Entries past N=8's documented boundary are
//! guesses (see the inline comment at the tail of each N=8 row) — treated
//! only as a starting point for table sizing, never a hard cap (spec open
//! question on "guess" rows).

/// `LEVEL_SIZES_SWAP0[n][d]` — hint for the table scale at BFS depth `d`
/// (externally reported as `Depth = d-1`) when rows and columns share one
/// permutation (SWAP=0).
pub const LEVEL_SIZES_SWAP0: [&[u8]; 9] = [
    &[],
    &[0],
    &[0, 0, 0, 0],
    &[0, 3, 4, 4, 3, 0, 0],
    &[0, 3, 5, 7, 8, 9, 8, 5, 0, 0],
    &[0, 3, 5, 8, 11, 13, 14, 15, 15, 13, 8, 0, 0],
    &[0, 3, 6, 8, 11, 14, 17, 19, 22, 23, 24, 23, 20, 11, 0, 0],
    &[0, 3, 6, 8, 11, 15, 18, 21, 24, 27, 30, 32, 33, 34, 33, 29, 17, 0, 0],
    &[
        0, 3, 6, 8, 11, 15, 18, 22, 25, 29, 32, 35, // guess from here on:
        37, 38, 40, 41, 40, 38, 36, 34, 0, 0,
    ],
];

/// Same table for the SWAP=1 regime (independent row/column permutations —
/// "free swap gates").
pub const LEVEL_SIZES_SWAP1: [&[u8]; 9] = [
    &[],
    &[0],
    &[0, 0, 0, 0],
    &[0, 3, 4, 4, 3, 0, 0],
    &[0, 3, 5, 5, 3, 0, 0, 0, 0, 0],
    &[0, 3, 5, 7, 9, 9, 7, 3, 0, 0, 0, 0, 0],
    &[0, 3, 5, 8, 10, 13, 14, 15, 13, 10, 3, 0, 0, 0, 0, 0],
    &[0, 3, 5, 8, 11, 14, 16, 19, 21, 22, 22, 20, 13, 2, 0, 0, 0, 0, 0],
    &[
        0, 3, 5, 8, 11, 14, 17, 20, 23, 26, 28, 30, 31, 30, 28, 21, 3, 0, 0, 0, 0, 0,
    ],
];

/// Look up the hint for `(n, depth)`, defaulting to `0` past the end of the
/// table (the clamp to `[3, MAX]` downstream absorbs this).
pub fn hint(n: u8, depth: usize, swap: bool) -> u8 {
    let table = if swap {
        &LEVEL_SIZES_SWAP1
    } else {
        &LEVEL_SIZES_SWAP0
    };
    table[n as usize].get(depth).copied().unwrap_or(0)
}

/// Clamp a raw scale hint into `[3, max]`, adding `extra` bits first.
pub fn scale_for(hint: u8, extra: u8, max: u8) -> u32 {
    (hint as u32 + extra as u32).clamp(3, max as u32)
}
