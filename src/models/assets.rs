//! Identifier-bearing and categorical domain values
//!
//! Assets are referred to externally by a stable identifier; locations and
//! trade types by their display string.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;
use crate::normalize::{Identified, Value};

// == Asset ==
/// An asset known by its identifier (e.g. `ETH`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct Asset(String);

impl Asset {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }
}

impl Identified for Asset {
    fn identifier(&self) -> &str {
        &self.0
    }
}

impl From<&Asset> for Value {
    fn from(asset: &Asset) -> Self {
        Value::identifier(asset)
    }
}

// == Location ==
/// Where a trade or balance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Kraken,
    Binance,
    Coinbase,
    Blockchain,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Location::Kraken => "kraken",
            Location::Binance => "binance",
            Location::Coinbase => "coinbase",
            Location::Blockchain => "blockchain",
        };
        f.write_str(name)
    }
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kraken" => Ok(Location::Kraken),
            "binance" => Ok(Location::Binance),
            "coinbase" => Ok(Location::Coinbase),
            "blockchain" => Ok(Location::Blockchain),
            other => Err(Error::InvalidRequest(format!("Unknown location: {}", other))),
        }
    }
}

impl From<Location> for Value {
    fn from(location: Location) -> Self {
        Value::enumerated(&location)
    }
}

// == Trade Type ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Buy,
    Sell,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Buy => f.write_str("buy"),
            TradeType::Sell => f.write_str("sell"),
        }
    }
}

impl From<TradeType> for Value {
    fn from(trade_type: TradeType) -> Self {
        Value::enumerated(&trade_type)
    }
}
