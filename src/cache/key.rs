//! Cache Key Builder
//!
//! Derives a deterministic key from an operation name and its call arguments.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value as Json;
use sha2::{Digest, Sha256};

/// Reserved keyword controlling cache bypass. Never part of a key.
pub const IGNORE_CACHE: &str = "ignore_cache";

// == Call Arguments ==
/// Arguments of a single call to a cached operation.
///
/// Keyword arguments are kept sorted by name, so the order in which they are
/// supplied never changes the resulting key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Json>,
    keyword: BTreeMap<String, Json>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    pub fn arg(mut self, value: impl Into<Json>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a keyword argument, replacing any previous value under `name`.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Json>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn positional(&self) -> &[Json] {
        &self.positional
    }

    pub fn get(&self, index: usize) -> Option<&Json> {
        self.positional.get(index)
    }

    pub fn keyword(&self, name: &str) -> Option<&Json> {
        self.keyword.get(name)
    }

    /// Keyword arguments in name order.
    pub fn keywords(&self) -> &BTreeMap<String, Json> {
        &self.keyword
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

// == Cache Key ==
/// Hex SHA-256 digest identifying one cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight hex digits, enough to tell keys apart in logs.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Build Key ==
/// Builds the cache key for a call.
///
/// When `arguments_matter` is false the key depends on `name` alone, so every
/// call shares one slot. The keyword named `reserved` is always skipped. A call
/// without arguments maps to the same slot as the name-only key.
///
/// Every part is length-prefixed so that argument boundaries cannot collide
/// (`("ab", "c")` and `("a", "bc")` hash differently).
pub fn build_key(name: &str, arguments_matter: bool, reserved: &str, args: &CallArgs) -> CacheKey {
    let mut hasher = Sha256::new();
    write_part(&mut hasher, name.as_bytes());

    if arguments_matter {
        let keyword: Vec<(&String, &Json)> = args
            .keyword
            .iter()
            .filter(|(k, _)| k.as_str() != reserved)
            .collect();

        if !args.positional.is_empty() || !keyword.is_empty() {
            hasher.update((args.positional.len() as u64).to_le_bytes());
            for value in &args.positional {
                write_part(&mut hasher, value.to_string().as_bytes());
            }
            hasher.update((keyword.len() as u64).to_le_bytes());
            for (k, value) in keyword {
                write_part(&mut hasher, k.as_bytes());
                write_part(&mut hasher, value.to_string().as_bytes());
            }
        }
    }

    CacheKey(format!("{:x}", hasher.finalize()))
}

fn write_part(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
