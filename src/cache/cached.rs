//! Cached Operations
//!
//! [`Cacheable`] is the capability an owner exposes by holding a
//! [`CacheStore`]; [`Cached`] wraps an operation of such an owner so that its
//! results are memoized for the owner's TTL.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value as Json;

use crate::cache::{build_key, CacheKey, CacheStore, CallArgs, IGNORE_CACHE};

// == Cacheable ==
/// An object whose operations can be wrapped in [`Cached`].
pub trait Cacheable<T: Clone> {
    /// The store owned by this object.
    fn results_cache(&self) -> &CacheStore<T>;

    fn cache_ttl_secs(&self) -> u64 {
        self.results_cache().ttl_secs()
    }

    /// Sets the TTL in seconds; 0 disables caching.
    fn set_cache_ttl_secs(&self, secs: u64) {
        self.results_cache().set_ttl_secs(secs);
    }

    /// Drops the entry a call to `name` with `args` would use, if any.
    ///
    /// Keys are computed as if arguments matter. For an operation wrapped with
    /// `arguments_matter(false)` pass empty arguments to reach its single slot.
    fn flush_cache(&self, name: &str, args: &CallArgs) -> bool {
        let key = build_key(name, true, IGNORE_CACHE, args);
        self.results_cache().remove(&key)
    }
}

// == Cached ==
/// A memoizing wrapper around one operation of a [`Cacheable`] owner.
///
/// The operation receives the owner, the call arguments and the bypass flag
/// (always `false` unless forwarding is enabled).
#[derive(Clone, Copy)]
pub struct Cached<F> {
    name: &'static str,
    op: F,
    arguments_matter: bool,
    forward_ignore_cache: bool,
}

impl<F> Cached<F> {
    /// Wraps `op`, keyed by `name` and by its arguments.
    pub fn new(name: &'static str, op: F) -> Self {
        Self {
            name,
            op,
            arguments_matter: true,
            forward_ignore_cache: false,
        }
    }

    /// When false, all calls share one slot regardless of arguments.
    pub fn arguments_matter(mut self, matter: bool) -> Self {
        self.arguments_matter = matter;
        self
    }

    /// When true, the bypass flag is also handed to the operation.
    pub fn forward_ignore_cache(mut self, forward: bool) -> Self {
        self.forward_ignore_cache = forward;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key a call with `args` would use.
    pub fn key(&self, args: &CallArgs) -> CacheKey {
        build_key(self.name, self.arguments_matter, IGNORE_CACHE, args)
    }

    // == Invoke ==
    /// Calls the operation through the owner's cache.
    ///
    /// `ignore_cache` forces a miss; an `ignore_cache: true` keyword inside
    /// `args` does the same. Errors from the operation are returned unchanged
    /// and never cached.
    pub fn invoke<O, T, E>(&self, owner: &O, args: &CallArgs, ignore_cache: bool) -> Result<T, E>
    where
        O: Cacheable<T>,
        T: Clone,
        F: Fn(&O, &CallArgs, bool) -> Result<T, E>,
    {
        let ignore_cache =
            ignore_cache || args.keyword(IGNORE_CACHE).and_then(Json::as_bool) == Some(true);
        let key = self.key(args);

        let op_args = if self.forward_ignore_cache {
            Cow::Borrowed(args)
        } else {
            strip_reserved(args)
        };
        let forwarded = self.forward_ignore_cache && ignore_cache;

        owner
            .results_cache()
            .get_or_compute(self.name, key, ignore_cache, || {
                (self.op)(owner, &*op_args, forwarded)
            })
    }
}

impl<F> fmt::Debug for Cached<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cached")
            .field("name", &self.name)
            .field("arguments_matter", &self.arguments_matter)
            .field("forward_ignore_cache", &self.forward_ignore_cache)
            .finish()
    }
}

/// Drops the reserved keyword so a non-forwarding operation never sees it.
fn strip_reserved(args: &CallArgs) -> Cow<'_, CallArgs> {
    if args.keyword(IGNORE_CACHE).is_none() {
        return Cow::Borrowed(args);
    }
    let mut stripped = CallArgs::new();
    for value in args.positional() {
        stripped = stripped.arg(value.clone());
    }
    for (name, value) in args.keywords() {
        if name != IGNORE_CACHE {
            stripped = stripped.kwarg(name.clone(), value.clone());
        }
    }
    Cow::Owned(stripped)
}
