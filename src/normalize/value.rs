//! Value Categories
//!
//! The closed set of value shapes the normalizer knows how to turn into JSON.
//! Domain types enter the normalizer by converting themselves into a [`Value`].

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{Number, Value as Json};

// == Capabilities ==
/// A value whose canonical external representation is a stable string identifier.
pub trait Identified {
    fn identifier(&self) -> &str;
}

/// A value that knows how to produce its own representation.
pub trait Serializable: fmt::Debug + Send + Sync {
    fn serialize(&self) -> Serialized;
}

/// A structured value exposing a mapping from field name to field value.
pub trait Record: fmt::Debug + Send + Sync {
    fn fields(&self) -> Vec<(&'static str, Value)>;
}

/// Output of [`Serializable::serialize`].
#[derive(Debug, Clone)]
pub enum Serialized {
    /// Already JSON-safe, returned untouched
    Finished(Json),
    /// Still holds raw domain values and is normalized recursively
    Partial(Value),
}

// == Map Keys ==
/// Key of a [`Value::Map`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Str(String),
    /// Replaced by its identifier string in the output
    Identifier(String),
}

impl Key {
    pub fn identifier(value: &impl Identified) -> Self {
        Key::Identifier(value.identifier().to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Key::Str(s) | Key::Identifier(s) => s,
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

// == Pre-shaped Rows ==
/// A single field of a [`Row`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Passes through as a plain integer
    Time(i64),
    /// Emitted as an exact decimal string
    Amount(Decimal),
    /// Emitted as its display string
    Category(String),
    /// Emitted as its identifier string
    Identifier(String),
}

/// A value kind with a fixed field layout, e.g. a balance-history row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(&'static str, Field)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(mut self, name: &'static str, ts: i64) -> Self {
        self.fields.push((name, Field::Time(ts)));
        self
    }

    pub fn amount(mut self, name: &'static str, amount: Decimal) -> Self {
        self.fields.push((name, Field::Amount(amount)));
        self
    }

    pub fn category(mut self, name: &'static str, category: &impl fmt::Display) -> Self {
        self.fields.push((name, Field::Category(category.to_string())));
        self
    }

    pub fn identifier(mut self, name: &'static str, value: &impl Identified) -> Self {
        self.fields
            .push((name, Field::Identifier(value.identifier().to_string())));
        self
    }

    pub fn fields(&self) -> &[(&'static str, Field)] {
        &self.fields
    }
}

// == Value ==
/// Input taxonomy of the normalizer.
///
/// Adding a variant forces every `match` over it to be revisited, so new
/// domain value kinds cannot silently fall through to passthrough.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    Str(String),
    Decimal(Decimal),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Map(Vec<(Key, Value)>),
    /// Rejected by the normalizer
    Tuple(Vec<Value>),
    Row(Row),
    Serializable(Arc<dyn Serializable>),
    Record(Arc<dyn Record>),
    Identifier(String),
    Enumerated(String),
}

impl Value {
    pub fn identifier(value: &impl Identified) -> Self {
        Value::Identifier(value.identifier().to_string())
    }

    pub fn enumerated(value: &impl fmt::Display) -> Self {
        Value::Enumerated(value.to_string())
    }

    pub fn serializable(value: impl Serializable + 'static) -> Self {
        Value::Serializable(Arc::new(value))
    }

    pub fn record(value: impl Record + 'static) -> Self {
        Value::Record(Arc::new(value))
    }

    /// Builds a map from string keys.
    pub fn map<K: Into<Key>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name of the category, used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Decimal(_) => "decimal",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Tuple(_) => "tuple",
            Value::Row(_) => "row",
            Value::Serializable(_) => "serializable",
            Value::Record(_) => "record",
            Value::Identifier(_) => "identifier",
            Value::Enumerated(_) => "enumerated",
        }
    }
}

// == Conversions ==
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<Row> for Value {
    fn from(row: Row) -> Self {
        Value::Row(row)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<Json> for Value {
    /// Structural conversion, so normalized output can be fed back in.
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n),
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Key::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
