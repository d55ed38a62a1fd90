//! Parallel, orbit-quotiented breadth-first search over invertible boolean
//! matrices under CNOT (row-addition) rewrites: graph diameters and
//! minimum-length circuit synthesis up to permutation equivalence.

pub mod canonical;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod hashset;
pub mod heartbeat;
pub mod level_sizes;
pub mod poly;
pub mod traceback;

pub use config::{Backend, Config};
pub use controller::{ProgressRecord, ProgressSide};
pub use engine::{Engine, SynthesisResult, SynthesisRun};
pub use error::EngineError;
