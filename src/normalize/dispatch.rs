//! Normalizer Dispatch
//!
//! Recursive, category-directed conversion of a [`Value`] graph into a
//! JSON-safe [`serde_json::Value`] tree.

use serde_json::{Map, Value as Json};

use crate::error::{Error, Result};
use crate::normalize::value::{Field, Row, Serialized, Value};

// == Normalize ==
/// Converts a value graph into its normalized JSON form.
///
/// Categories are handled in a fixed priority order:
/// decimals, lists, maps, bytes, pre-shaped rows, self-serializing values
/// (finished or partial), records, tuples (rejected), identifiers,
/// enumerations, then passthrough primitives.
///
/// Fails with [`Error::AmbiguousContainer`] if a tuple appears anywhere in the graph.
pub fn normalize(entry: &Value) -> Result<Json> {
    match entry {
        Value::Decimal(d) => Ok(Json::String(d.to_string())),
        Value::List(items) => items
            .iter()
            .map(normalize)
            .collect::<Result<Vec<_>>>()
            .map(Json::Array),
        Value::Map(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, value) in entries {
                map.insert(key.as_str().to_string(), normalize(value)?);
            }
            Ok(Json::Object(map))
        }
        Value::Bytes(bytes) => Ok(Json::String(format!("0x{}", hex::encode(bytes)))),
        Value::Row(row) => Ok(normalize_row(row)),
        Value::Serializable(inner) => match inner.serialize() {
            Serialized::Finished(json) => Ok(json),
            Serialized::Partial(value) => normalize(&value),
        },
        Value::Record(record) => {
            let mut map = Map::new();
            for (name, value) in record.fields() {
                map.insert(name.to_string(), normalize(&value)?);
            }
            Ok(Json::Object(map))
        }
        Value::Tuple(items) => Err(Error::AmbiguousContainer { len: items.len() }),
        Value::Identifier(id) => Ok(Json::String(id.clone())),
        Value::Enumerated(display) => Ok(Json::String(display.clone())),
        Value::Null => Ok(Json::Null),
        Value::Bool(b) => Ok(Json::Bool(*b)),
        Value::Number(n) => Ok(Json::Number(n.clone())),
        Value::Str(s) => Ok(Json::String(s.clone())),
    }
}

fn normalize_row(row: &Row) -> Json {
    let map = row
        .fields()
        .iter()
        .map(|(name, field)| {
            let json = match field {
                Field::Time(ts) => Json::from(*ts),
                Field::Amount(amount) => Json::String(amount.to_string()),
                Field::Category(s) | Field::Identifier(s) => Json::String(s.clone()),
            };
            (name.to_string(), json)
        })
        .collect();
    Json::Object(map)
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "sequence",
        Json::Object(_) => "mapping",
    }
}

// == Checked Entry Points ==
/// Normalizes a result that must be a mapping at the top level.
pub fn normalize_to_mapping(result: &Value) -> Result<Map<String, Json>> {
    match normalize(result)? {
        Json::Object(map) => Ok(map),
        other => Err(Error::Shape {
            expected: "mapping",
            found: json_kind(&other),
        }),
    }
}

/// Normalizes a result that must be a sequence at the top level.
pub fn normalize_to_sequence(result: &Value) -> Result<Vec<Json>> {
    match normalize(result)? {
        Json::Array(items) => Ok(items),
        other => Err(Error::Shape {
            expected: "sequence",
            found: json_kind(&other),
        }),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::value::{Identified, Key, Record, Serializable};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::str::FromStr;

    #[derive(Debug)]
    struct Asset(&'static str);

    impl Identified for Asset {
        fn identifier(&self) -> &str {
            self.0
        }
    }

    #[derive(Debug)]
    struct Finished;

    impl Serializable for Finished {
        fn serialize(&self) -> Serialized {
            Serialized::Finished(json!({"version": "1.2.0", "raw": 1.5}))
        }
    }

    #[derive(Debug)]
    struct Partial;

    impl Serializable for Partial {
        fn serialize(&self) -> Serialized {
            Serialized::Partial(Value::map([
                ("amount", Value::Decimal(Decimal::from_str("0.1").unwrap())),
                ("asset", Value::identifier(&Asset("BTC"))),
            ]))
        }
    }

    #[derive(Debug)]
    struct Settings {
        premium: bool,
        threshold: Decimal,
    }

    impl Record for Settings {
        fn fields(&self) -> Vec<(&'static str, Value)> {
            vec![
                ("premium", self.premium.into()),
                ("threshold", self.threshold.into()),
            ]
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_decimal_keeps_exact_representation() {
        let d = dec("123456789012345678.000000000123");
        assert_eq!(
            normalize(&Value::Decimal(d)).unwrap(),
            json!("123456789012345678.000000000123")
        );
        assert_eq!(normalize(&Value::Decimal(dec("1.50"))).unwrap(), json!("1.50"));
    }

    #[test]
    fn test_list_is_normalized_elementwise() {
        let value = Value::List(vec![Value::Decimal(dec("2")), Value::from(3i64), Value::Null]);
        assert_eq!(normalize(&value).unwrap(), json!(["2", 3, null]));
    }

    #[test]
    fn test_identifier_keys_are_replaced() {
        let numeric = Value::Map(vec![(Key::identifier(&Asset("ETH")), Value::Decimal(dec("5")))]);
        assert_eq!(normalize(&numeric).unwrap(), json!({"ETH": "5"}));

        let passthrough = Value::Map(vec![(Key::identifier(&Asset("ETH")), Value::from(5i64))]);
        assert_eq!(normalize(&passthrough).unwrap(), json!({"ETH": 5}));
    }

    #[test]
    fn test_colliding_keys_keep_last_entry() {
        let value = Value::Map(vec![
            (Key::from("ETH"), Value::from(1i64)),
            (Key::identifier(&Asset("ETH")), Value::from(2i64)),
        ]);
        assert_eq!(normalize(&value).unwrap(), json!({"ETH": 2}));
    }

    #[test]
    fn test_bytes_are_hex_encoded() {
        let value = Value::Bytes(vec![0xde, 0xad, 0x01]);
        assert_eq!(normalize(&value).unwrap(), json!("0xdead01"));
        assert_eq!(normalize(&Value::Bytes(vec![])).unwrap(), json!("0x"));
    }

    #[test]
    fn test_row_fields_are_normalized_individually() {
        let row = Row::new()
            .time("time", 1_600_000_000)
            .category("category", &"asset")
            .identifier("asset", &Asset("DAI"))
            .amount("amount", dec("10.5"))
            .amount("usd_value", dec("10.49"));
        assert_eq!(
            normalize(&Value::Row(row)).unwrap(),
            json!({
                "time": 1_600_000_000,
                "category": "asset",
                "asset": "DAI",
                "amount": "10.5",
                "usd_value": "10.49",
            })
        );
    }

    #[test]
    fn test_finished_serialization_is_returned_as_is() {
        let value = Value::serializable(Finished);
        assert_eq!(normalize(&value).unwrap(), json!({"version": "1.2.0", "raw": 1.5}));
    }

    #[test]
    fn test_partial_serialization_is_normalized() {
        let value = Value::serializable(Partial);
        assert_eq!(normalize(&value).unwrap(), json!({"amount": "0.1", "asset": "BTC"}));
    }

    #[test]
    fn test_record_fields_are_exported() {
        let value = Value::record(Settings {
            premium: true,
            threshold: dec("0.05"),
        });
        assert_eq!(
            normalize(&value).unwrap(),
            json!({"premium": true, "threshold": "0.05"})
        );
    }

    #[test]
    fn test_tuple_is_rejected() {
        let tuple = Value::Tuple(vec![Value::from(1i64), Value::from(2i64)]);
        assert_eq!(normalize(&tuple), Err(Error::AmbiguousContainer { len: 2 }));

        let list = Value::List(vec![Value::from(1i64), Value::from(2i64)]);
        assert_eq!(normalize(&list).unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_nested_tuple_is_rejected() {
        let value = Value::map([(
            "outer",
            Value::List(vec![Value::Tuple(vec![Value::Null])]),
        )]);
        assert!(matches!(
            normalize(&value),
            Err(Error::AmbiguousContainer { len: 1 })
        ));
    }

    #[test]
    fn test_identifier_and_enumerated_values() {
        assert_eq!(normalize(&Value::identifier(&Asset("BTC"))).unwrap(), json!("BTC"));
        assert_eq!(normalize(&Value::enumerated(&"buy")).unwrap(), json!("buy"));
    }

    #[test]
    fn test_passthrough_primitives() {
        assert_eq!(normalize(&Value::Null).unwrap(), json!(null));
        assert_eq!(normalize(&Value::from(true)).unwrap(), json!(true));
        assert_eq!(normalize(&Value::from("text")).unwrap(), json!("text"));
        assert_eq!(normalize(&Value::from(2.5f64)).unwrap(), json!(2.5));
    }

    #[test]
    fn test_normalize_to_mapping() {
        let value = Value::map([("a", Value::from(1i64))]);
        let map = normalize_to_mapping(&value).unwrap();
        assert_eq!(map.get("a"), Some(&json!(1)));

        let err = normalize_to_mapping(&Value::List(vec![])).unwrap_err();
        assert_eq!(
            err,
            Error::Shape {
                expected: "mapping",
                found: "sequence"
            }
        );
    }

    #[test]
    fn test_normalize_to_sequence() {
        let items = normalize_to_sequence(&Value::from(vec![1i64, 2, 3])).unwrap();
        assert_eq!(items, vec![json!(1), json!(2), json!(3)]);

        let err = normalize_to_sequence(&Value::from("x")).unwrap_err();
        assert_eq!(
            err,
            Error::Shape {
                expected: "sequence",
                found: "string"
            }
        );
    }

    #[test]
    fn test_checked_entry_points_propagate_tuple_error() {
        let value = Value::List(vec![Value::Tuple(vec![])]);
        assert_eq!(
            normalize_to_sequence(&value),
            Err(Error::AmbiguousContainer { len: 0 })
        );
    }
}
