//! Time Source
//!
//! Cache timestamps are whole seconds read from a [`Clock`]. The wall clock is
//! the default; tests substitute a logical clock they can advance by hand.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of "now" for TTL comparisons.
pub trait Clock: Send + Sync {
    /// Current time in whole seconds.
    fn now_secs(&self) -> u64;
}

// == System Clock ==
/// Wall clock, seconds since the UNIX epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        // Clamped so a clock set before 1970 reads as zero instead of wrapping
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

// == Manual Clock ==
/// Logical clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_secs: u64) -> Self {
        Self {
            now: AtomicU64::new(start_secs),
        }
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::Relaxed);
    }

    pub fn set(&self, secs: u64) {
        self.now.store(secs, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance_and_set() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_secs(), 100);

        clock.advance(601);
        assert_eq!(clock.now_secs(), 701);

        clock.set(5);
        assert_eq!(clock.now_secs(), 5);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-09-13, any sane wall clock is past this
        assert!(SystemClock.now_secs() > 1_600_000_000);
    }
}
