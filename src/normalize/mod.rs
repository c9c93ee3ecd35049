//! Normalize Module
//!
//! Turns heterogeneous, arbitrarily nested domain value graphs into JSON-safe
//! trees. Business logic should only call the checked entry points.

mod dispatch;
mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use dispatch::{normalize, normalize_to_mapping, normalize_to_sequence};
pub use value::{Field, Identified, Key, Record, Row, Serializable, Serialized, Value};
