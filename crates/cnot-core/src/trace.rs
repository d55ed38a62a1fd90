//! A CNOT gate trace: the ordered list of row-additions recovered by
//! trace-back, and the pure operations needed to replay or re-permute it.

use crate::matrix::Matrix;
use crate::permutation::Permutation;

/// A single `cx` gate: add row `i` into row `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    /// Control row.
    pub i: u8,
    /// Target row.
    pub j: u8,
}

/// An ordered sequence of CNOT gates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace(pub Vec<Gate>);

impl Trace {
    /// An empty trace.
    pub fn empty() -> Self {
        Trace(Vec::new())
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the trace has no gates.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reverse gate order in place (used to flip a backward-recovered half).
    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    /// Append another trace's gates after this one.
    pub fn extend(&mut self, other: Trace) {
        self.0.extend(other.0);
    }

    /// Apply `pi` pointwise to every gate: `(i,j) -> (pi(i), pi(j))`.
    pub fn permute(&self, pi: &Permutation) -> Trace {
        Trace(
            self.0
                .iter()
                .map(|g| Gate {
                    i: pi.apply(g.i),
                    j: pi.apply(g.j),
                })
                .collect(),
        )
    }

    /// Replay the trace against `start`, returning the resulting matrix.
    pub fn apply(&self, start: Matrix) -> Matrix {
        self.0.iter().fold(start, |m, g| m.cnot(g.i, g.j))
    }
}
