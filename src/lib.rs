//! normcache - JSON-safe normalization and per-owner result caching
//!
//! Converts nested domain value graphs into JSON trees without losing numeric
//! precision, and memoizes expensive per-object queries for a configurable
//! time window keyed by call signature.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod normalize;

pub use api::AppState;
pub use config::Config;
pub use error::{Error, Result};
