//! Per-worker progress pings during a long frontier expansion (`BEAT` in
//! the original). Each rayon worker checks its own last-beat `Instant`
//! lock-free and only takes the `Mutex` to actually emit a line, mirroring
//! the original's OpenMP `#pragma omp critical` section around `lifeBeat`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use tracing::info;

/// Tracks the start time and gates concurrent progress logging.
pub struct Heartbeat {
    start: Instant,
    interval: Option<std::time::Duration>,
    last_beat: Mutex<Instant>,
    seconds_elapsed: AtomicU64,
}

impl Heartbeat {
    /// `interval_secs == 0` disables heartbeat logging entirely.
    pub fn new(interval_secs: u64) -> Self {
        let start = Instant::now();
        Self {
            start,
            interval: (interval_secs > 0).then(|| std::time::Duration::from_secs(interval_secs)),
            last_beat: Mutex::new(start),
            seconds_elapsed: AtomicU64::new(0),
        }
    }

    /// Seconds since the engine started.
    pub fn elapsed_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }

    /// Called by a worker after contributing `level`/`count` to the current
    /// frontier; logs at most once per `interval` across all workers.
    pub fn maybe_beat(&self, worker: usize, level: u64, count: u64) {
        let Some(interval) = self.interval else {
            return;
        };
        let mut last = self.last_beat.lock();
        if last.elapsed() >= interval {
            *last = Instant::now();
            self.seconds_elapsed
                .store(self.elapsed_secs(), Ordering::Relaxed);
            info!(worker, elapsed_s = self.elapsed_secs(), level, count, "heartbeat");
        }
    }

    /// Log a depth-completion report (`report()` in the original).
    pub fn report(&self, level: u64, orbit: u64) {
        info!(elapsed_s = self.elapsed_secs(), level, orbit, "level complete");
    }
}
