//! Structured domain values
//!
//! Each type picks the value category it is normalized through: balances and
//! version checks serialize themselves, trades export their fields, history
//! rows have a fixed layout.

use std::fmt;

use rust_decimal::Decimal;
use serde_json::json;

use crate::models::{Asset, Location, TradeType};
use crate::normalize::{Record, Row, Serializable, Serialized, Value};

// == Balance ==
/// Amount of an asset and its value in USD.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Balance {
    pub amount: Decimal,
    pub usd_value: Decimal,
}

impl Balance {
    pub fn new(amount: Decimal, usd_value: Decimal) -> Self {
        Self { amount, usd_value }
    }
}

impl Serializable for Balance {
    fn serialize(&self) -> Serialized {
        Serialized::Partial(Value::map([
            ("amount", Value::Decimal(self.amount)),
            ("usd_value", Value::Decimal(self.usd_value)),
        ]))
    }
}

// == Trade ==
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub timestamp: i64,
    pub location: Location,
    pub base: Asset,
    pub quote: Asset,
    pub trade_type: TradeType,
    pub amount: Decimal,
    pub rate: Decimal,
    pub fee: Decimal,
    pub link: Option<String>,
}

impl Record for Trade {
    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("timestamp", self.timestamp.into()),
            ("location", self.location.into()),
            ("base_asset", Value::from(&self.base)),
            ("quote_asset", Value::from(&self.quote)),
            ("trade_type", self.trade_type.into()),
            ("amount", self.amount.into()),
            ("rate", self.rate.into()),
            ("fee", self.fee.into()),
            ("link", self.link.clone().into()),
        ]
    }
}

// == Balance Category ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceCategory {
    Asset,
    Liability,
}

impl fmt::Display for BalanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceCategory::Asset => f.write_str("asset"),
            BalanceCategory::Liability => f.write_str("liability"),
        }
    }
}

// == History Rows ==
/// USD value held at one location at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationData {
    pub time: i64,
    pub location: Location,
    pub usd_value: Decimal,
}

impl From<&LocationData> for Value {
    fn from(data: &LocationData) -> Self {
        Row::new()
            .time("time", data.time)
            .category("location", &data.location)
            .amount("usd_value", data.usd_value)
            .into()
    }
}

/// Balance of one asset at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetBalance {
    pub time: i64,
    pub category: BalanceCategory,
    pub asset: Asset,
    pub amount: Decimal,
    pub usd_value: Decimal,
}

impl From<&AssetBalance> for Value {
    fn from(balance: &AssetBalance) -> Self {
        Row::new()
            .time("time", balance.time)
            .category("category", &balance.category)
            .identifier("asset", &balance.asset)
            .amount("amount", balance.amount)
            .amount("usd_value", balance.usd_value)
            .into()
    }
}

// == Version Check ==
/// Result of comparing the running version with the latest release.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionInfo {
    pub our_version: String,
    pub latest_version: Option<String>,
    pub download_url: Option<String>,
}

impl Serializable for VersionInfo {
    fn serialize(&self) -> Serialized {
        Serialized::Finished(json!({
            "our_version": self.our_version,
            "latest_version": self.latest_version,
            "download_url": self.download_url,
        }))
    }
}
