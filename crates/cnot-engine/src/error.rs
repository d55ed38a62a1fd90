//! Errors raised by the BFS engine itself (as opposed to CLI/input errors,
//! which live in `cnot-cli`).

/// Fatal engine-internal errors. None of these are recovered locally —
/// encountering one aborts the whole run (spec: "process state is
/// considered non-recoverable on any internal invariant failure").
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An incompatible combination of configuration flags was requested.
    #[error("configuration error: {reason}")]
    Config {
        /// Human-readable explanation.
        reason: String,
    },
    /// A frontier's probe sequence exhausted the table without finding an
    /// empty slot.
    #[error("hash table full at scale 2^{scale} ({buckets} buckets)")]
    Capacity {
        /// log2(bucket count) of the table that filled up.
        scale: u32,
        /// Bucket count (`1 << scale`).
        buckets: u64,
    },
    /// A structural invariant was violated: a predecessor was not found
    /// during trace-back, or a canonicalizer backend's structural
    /// assumption did not hold.
    #[error("invariant violation: {reason}")]
    Invariant {
        /// Human-readable explanation.
        reason: String,
    },
}
