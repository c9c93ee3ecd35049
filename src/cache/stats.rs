//! Cache Statistics Module
//!
//! Tracks how cached operations were served.

use serde::Serialize;

// == Cache Stats ==
/// Counters for one cache store.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CacheStats {
    /// Calls answered from a fresh entry
    pub hits: u64,
    /// Calls that ran the operation (bypasses included)
    pub misses: u64,
    /// Calls that asked to skip the cache
    pub bypasses: u64,
    /// Operation runs that returned an error
    pub failures: u64,
    /// Entries removed by an explicit flush
    pub flushes: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing was called yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_bypass(&mut self) {
        self.bypasses += 1;
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    pub fn record_flush(&mut self) {
        self.flushes += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_hit_rate_all_misses() {
        let mut stats = CacheStats::new();
        stats.record_miss();
        stats.record_bypass();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.bypasses, 1);
    }

    #[test]
    fn test_failure_and_flush_counters() {
        let mut stats = CacheStats::new();
        stats.record_failure();
        stats.record_flush();
        stats.record_flush();
        stats.set_total_entries(3);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.flushes, 2);
        assert_eq!(stats.total_entries, 3);
    }
}
