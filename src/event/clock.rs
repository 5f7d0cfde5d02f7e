//! Timestamp sources
//!
//! Timestamps label events only; nothing orders work by them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of event timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Microseconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0)
    }
}

/// Deterministic clock for tests: each reading advances by one
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: AtomicU64,
}

impl ManualClock {
    pub fn starting_at(start: u64) -> Self {
        Self {
            ticks: AtomicU64::new(start),
        }
    }

    /// Jump the clock to `value`
    pub fn set(&self, value: u64) {
        self.ticks.store(value, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::SeqCst)
    }
}
