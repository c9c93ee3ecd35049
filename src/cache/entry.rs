//! Cache Entry Module
//!
//! Defines a memoized result together with the time it was computed.

// == Cache Entry ==
/// A memoized result of a cached operation.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The stored result
    pub result: T,
    /// When the computation started (seconds, from the store's clock)
    pub timestamp: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    pub fn new(result: T, timestamp: u64) -> Self {
        Self { result, timestamp }
    }

    // == Age ==
    /// Seconds elapsed since the entry was written.
    ///
    /// A clock that moved backwards reads as age zero.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    // == Is Fresh ==
    /// Checks whether the entry may still be served.
    ///
    /// Boundary condition: an entry is stale once its age reaches the TTL, so
    /// a TTL of zero never serves anything.
    pub fn is_fresh(&self, now: u64, ttl_secs: u64) -> bool {
        self.age(now) < ttl_secs
    }
}
