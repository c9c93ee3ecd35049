//! Property-Based Tests for the Normalizer
//!
//! Uses proptest to check idempotence, precision and tuple rejection over
//! generated value graphs.

use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::Value as Json;
use std::str::FromStr;

use crate::error::Error;
use crate::normalize::{normalize, Key, Row, Value};

// == Strategies ==
fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    (any::<i64>(), 0u32..=18).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::from),
        decimal_strategy().prop_map(Value::Decimal),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
        "[A-Z]{3,5}".prop_map(Value::Identifier),
        "[a-z ]{1,12}".prop_map(Value::Enumerated),
        (any::<i64>(), decimal_strategy(), "[a-z]{3,8}").prop_map(|(ts, amount, location)| {
            Value::Row(
                Row::new()
                    .time("time", ts)
                    .category("location", &location)
                    .amount("usd_value", amount),
            )
        }),
    ]
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        "[a-z_]{1,10}".prop_map(Key::Str),
        "[A-Z]{3,5}".prop_map(Key::Identifier),
    ]
}

/// Acyclic value graphs without tuples
fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::List),
            prop::collection::vec((key_strategy(), inner), 0..8).prop_map(Value::Map),
        ]
    })
}

fn contains_float(json: &Json) -> bool {
    match json {
        Json::Number(n) => n.is_f64(),
        Json::Array(items) => items.iter().any(contains_float),
        Json::Object(map) => map.values().any(contains_float),
        _ => false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // normalize(normalize(x)) == normalize(x)
    #[test]
    fn prop_normalize_is_idempotent(value in value_strategy()) {
        let once = normalize(&value).unwrap();
        let twice = normalize(&Value::from(once.clone())).unwrap();
        prop_assert_eq!(twice, once);
    }

    // The decimal string parses back to the exact same number.
    #[test]
    fn prop_decimal_precision_preserved(d in decimal_strategy()) {
        let json = normalize(&Value::Decimal(d)).unwrap();
        let s = json.as_str().unwrap().to_string();
        prop_assert_eq!(&s, &d.to_string());
        prop_assert_eq!(Decimal::from_str(&s).unwrap(), d);
    }

    // Output of a graph holding only decimals never contains binary floats.
    #[test]
    fn prop_decimals_never_become_floats(
        items in prop::collection::vec(decimal_strategy(), 0..32)
    ) {
        let value = Value::List(items.into_iter().map(Value::Decimal).collect());
        let json = normalize(&value).unwrap();
        prop_assert!(!contains_float(&json));
    }

    // A tuple anywhere inside a list is rejected.
    #[test]
    fn prop_tuple_anywhere_is_rejected(
        prefix in prop::collection::vec(value_strategy(), 0..4),
        suffix in prop::collection::vec(value_strategy(), 0..4),
        len in 0usize..4
    ) {
        let mut items = prefix;
        items.push(Value::Tuple(vec![Value::Null; len]));
        items.extend(suffix);
        let result = normalize(&Value::List(items));
        prop_assert_eq!(result, Err(Error::AmbiguousContainer { len }));
    }
}
