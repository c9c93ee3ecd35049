//! Cache Store Module
//!
//! Per-owner result store: memoized entries, TTL, statistics, and a
//! single-flight guard per key.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheKey, CacheStats, Clock, SystemClock};

/// Seconds for which results are cached unless the owner says otherwise.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;

// == Cache Store ==
/// Result store owned by exactly one object.
///
/// The read-decide-write sequence runs under one lock, and concurrent misses on
/// the same key are serialized so the operation runs once for all of them.
pub struct CacheStore<T> {
    /// Entries and counters
    state: Mutex<StoreState<T>>,
    /// In-flight computations by key. Re-entrant so an operation may call
    /// back into its own slot on the leading thread.
    flights: Mutex<HashMap<CacheKey, Arc<ReentrantMutex<()>>>>,
    /// TTL in seconds, 0 disables caching
    ttl_secs: AtomicU64,
    clock: Arc<dyn Clock>,
}

struct StoreState<T> {
    entries: HashMap<CacheKey, CacheEntry<T>>,
    stats: CacheStats,
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates an empty store reading time from the wall clock.
    pub fn new(ttl_secs: u64) -> Self {
        Self::with_clock(ttl_secs, Arc::new(SystemClock))
    }

    /// Creates an empty store reading time from `clock`.
    pub fn with_clock(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                entries: HashMap::new(),
                stats: CacheStats::new(),
            }),
            flights: Mutex::new(HashMap::new()),
            ttl_secs: AtomicU64::new(ttl_secs),
            clock,
        }
    }

    // == TTL ==
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs.load(Ordering::Relaxed)
    }

    /// Changes the TTL. Existing entries are judged against the new value on
    /// their next lookup.
    pub fn set_ttl_secs(&self, secs: u64) {
        let previous = self.ttl_secs.swap(secs, Ordering::Relaxed);
        if previous != secs {
            info!("Cache TTL changed from {}s to {}s", previous, secs);
        }
    }

    pub fn now_secs(&self) -> u64 {
        self.clock.now_secs()
    }

    // == Get Or Compute ==
    /// Returns the memoized result for `key`, or runs `compute` and stores its
    /// result.
    ///
    /// A call misses when `ignore_cache` is set, no entry exists, or the entry
    /// is at least TTL seconds old. A failed computation stores nothing and its
    /// error is returned untouched.
    pub fn get_or_compute<E>(
        &self,
        name: &str,
        key: CacheKey,
        ignore_cache: bool,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let now = self.now_secs();

        if !ignore_cache {
            if let Some(result) = self.lookup(name, &key, now) {
                return Ok(result);
            }
        }

        let flight = self.join_flight(&key);
        let _leader = flight.lock.lock();

        // Another caller may have filled the slot while we waited
        if !ignore_cache {
            if let Some(result) = self.lookup(name, &key, now) {
                return Ok(result);
            }
        }

        {
            let mut state = self.state.lock();
            state.stats.record_miss();
            if ignore_cache {
                state.stats.record_bypass();
            }
        }
        debug!(
            op = name,
            key = key.short(),
            ignore_cache,
            "Cache miss, running operation"
        );

        match compute() {
            Ok(result) => {
                self.insert(key.clone(), result.clone(), now);
                Ok(result)
            }
            Err(err) => {
                warn!(op = name, key = key.short(), "Cached operation failed, nothing stored");
                self.state.lock().stats.record_failure();
                Err(err)
            }
        }
    }

    // == Lookup ==
    /// Returns a clone of the entry under `key` if it is fresh at `now`.
    fn lookup(&self, name: &str, key: &CacheKey, now: u64) -> Option<T> {
        let ttl = self.ttl_secs();
        let mut state = self.state.lock();
        let result = state
            .entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| entry.result.clone())?;
        state.stats.record_hit();
        debug!(op = name, key = key.short(), "Cache hit");
        Some(result)
    }

    // == Insert ==
    /// Stores `result` under `key`, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, result: T, timestamp: u64) {
        let mut state = self.state.lock();
        state.entries.insert(key, CacheEntry::new(result, timestamp));
        let len = state.entries.len();
        state.stats.set_total_entries(len);
    }

    /// Returns a clone of the entry under `key`, fresh or not.
    pub fn entry(&self, key: &CacheKey) -> Option<CacheEntry<T>> {
        self.state.lock().entries.get(key).cloned()
    }

    // == Remove ==
    /// Removes the entry under `key`. Returns whether one was present.
    pub fn remove(&self, key: &CacheKey) -> bool {
        let mut state = self.state.lock();
        let removed = state.entries.remove(key).is_some();
        if removed {
            state.stats.record_flush();
            let len = state.entries.len();
            state.stats.set_total_entries(len);
            debug!(key = key.short(), "Cache entry flushed");
        }
        removed
    }

    // == Clear ==
    /// Removes every entry. Returns the number removed.
    pub fn clear(&self) -> usize {
        let mut state = self.state.lock();
        let count = state.entries.len();
        state.entries.clear();
        state.stats.set_total_entries(0);
        count
    }

    // == Purge Expired ==
    /// Removes entries that could no longer be served.
    ///
    /// Staleness is otherwise only noticed on lookup; this just reclaims memory.
    pub fn purge_expired(&self) -> usize {
        let now = self.now_secs();
        let ttl = self.ttl_secs();
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.is_fresh(now, ttl));
        let len = state.entries.len();
        state.stats.set_total_entries(len);
        before - len
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    // == Single Flight ==
    fn join_flight<'a>(&'a self, key: &'a CacheKey) -> Flight<'a, T> {
        let lock = self
            .flights
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(ReentrantMutex::new(())))
            .clone();
        Flight {
            store: self,
            key,
            lock,
        }
    }
}

impl<T> fmt::Debug for CacheStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("ttl_secs", &self.ttl_secs.load(Ordering::Relaxed))
            .field("entries", &self.state.lock().entries.len())
            .finish()
    }
}

/// Membership in the set of callers computing one key.
struct Flight<'a, T> {
    store: &'a CacheStore<T>,
    key: &'a CacheKey,
    lock: Arc<ReentrantMutex<()>>,
}

impl<T> Drop for Flight<'_, T> {
    fn drop(&mut self) {
        let mut flights = self.store.flights.lock();
        // Only the map and this flight still hold the lock: nobody is waiting
        let idle = flights
            .get(self.key)
            .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2);
        if idle {
            flights.remove(self.key);
        }
    }
}
