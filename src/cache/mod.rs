//! Cache Module
//!
//! Per-owner memoization of expensive operations for a configurable time
//! window, keyed by call signature.

mod cached;
mod clock;
mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use cached::{Cacheable, Cached};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use key::{build_key, CacheKey, CallArgs, IGNORE_CACHE};
pub use stats::CacheStats;
pub use store::{CacheStore, DEFAULT_CACHE_TTL_SECS};
