//! CLI-facing errors: malformed arguments and goal-file I/O failures.
//! Engine-internal failures surface as [`cnot_engine::EngineError`] instead
//! and are wrapped at the root binary boundary.

/// Errors that can occur while parsing arguments or reading a goal file.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The `-<limit>` argument was not a nonnegative integer.
    #[error("invalid depth limit {value:?}: {source}")]
    InvalidLimit {
        /// The raw argument text.
        value: String,
        /// The underlying parse failure.
        #[source]
        source: std::num::ParseIntError,
    },

    /// The `-n<N>` argument was not a valid dimension.
    #[error("invalid dimension {value:?}: {source}")]
    InvalidDimension {
        /// The raw argument text.
        value: String,
        /// The underlying parse failure.
        #[source]
        source: std::num::ParseIntError,
    },

    /// The goal file could not be read.
    #[error("failed to read goal file {path}: {source}")]
    GoalFileIo {
        /// The path that failed to open/read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The goal file's contents did not parse as a matrix.
    #[error("goal file {path} is not a valid matrix: {source}")]
    GoalFileMatrix {
        /// The path whose contents failed to parse.
        path: String,
        /// The underlying parse failure.
        #[source]
        source: cnot_core::MatrixError,
    },
}

/// Top-level error for a CLI run: either a CLI-local failure or one
/// propagated from the engine (configuration, capacity, invariant).
/// Kept separate from [`CliError`] so `cnot-engine` stays free of any
/// dependency on this crate.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A CLI-local failure (bad arguments, bad goal file).
    #[error(transparent)]
    Cli(#[from] CliError),
    /// A failure surfaced by the search engine itself.
    #[error(transparent)]
    Engine(#[from] cnot_engine::EngineError),
}
