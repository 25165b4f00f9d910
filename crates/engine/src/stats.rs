//! Pass counters, shared between the engine handle and its event loop.

use crate::PassOutcome;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters over the engine's lifetime (not reset by `stop`).
#[derive(Debug, Default)]
pub struct EngineStats {
    passes: AtomicU64,
    patched: AtomicU64,
    skipped: AtomicU64,
    reinstalls: AtomicU64,
    faults: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub passes: u64,
    pub patched: u64,
    pub skipped: u64,
    pub reinstalls: u64,
    pub faults: u64,
}

impl EngineStats {
    pub(crate) fn record_pass(&self, outcome: PassOutcome) {
        self.passes.fetch_add(1, Ordering::Relaxed);
        self.patched
            .fetch_add(outcome.patched as u64, Ordering::Relaxed);
        self.skipped
            .fetch_add(outcome.skipped as u64, Ordering::Relaxed);
        if outcome.reinstalled {
            self.reinstalls.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_fault(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            passes: self.passes.load(Ordering::Relaxed),
            patched: self.patched.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            reinstalls: self.reinstalls.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
        }
    }
}
