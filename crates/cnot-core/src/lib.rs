//! Core data model for the CNOT orbit-BFS engine: packed matrices,
//! permutations, gate traces, and their associated errors.

mod error;
mod matrix;
mod permutation;
mod trace;

pub use error::MatrixError;
pub use matrix::Matrix;
pub use permutation::Permutation;
pub use trace::{Gate, Trace};
