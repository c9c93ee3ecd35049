//! Request DTOs for the ledger API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{Asset, Location, Trade, TradeType};

/// Query string accepted by the cached read endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    /// Skip the cache for this call
    #[serde(default)]
    pub ignore_cache: bool,
    /// Restricts trades to one location
    #[serde(default)]
    pub location: Option<String>,
}

/// Request body for PUT /cache/ttl
#[derive(Debug, Clone, Deserialize)]
pub struct TtlRequest {
    /// New TTL in seconds, 0 disables caching
    pub ttl_secs: u64,
}

/// Request body for POST /trades
///
/// Amounts travel as strings so no precision is lost on the way in.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeRequest {
    pub timestamp: i64,
    pub location: Location,
    pub base_asset: Asset,
    pub quote_asset: Asset,
    pub trade_type: TradeType,
    pub amount: String,
    pub rate: String,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl TradeRequest {
    /// Validates the request and builds the trade it describes
    pub fn into_trade(self) -> Result<Trade> {
        let amount = parse_amount("amount", &self.amount)?;
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidRequest("amount must be positive".to_string()));
        }
        let rate = parse_amount("rate", &self.rate)?;
        let fee = match &self.fee {
            Some(fee) => parse_amount("fee", fee)?,
            None => Decimal::ZERO,
        };
        if amount.checked_mul(rate).and_then(|cost| cost.checked_add(fee)).is_none() {
            return Err(Error::InvalidRequest(
                "amount * rate + fee is out of range".to_string(),
            ));
        }

        Ok(Trade {
            timestamp: self.timestamp,
            location: self.location,
            base: self.base_asset,
            quote: self.quote_asset,
            trade_type: self.trade_type,
            amount,
            rate,
            fee,
            link: self.link,
        })
    }
}

fn parse_amount(field: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw)
        .map_err(|e| Error::InvalidRequest(format!("invalid {} '{}': {}", field, raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: &str) -> TradeRequest {
        serde_json::from_str(&format!(
            r#"{{"timestamp": 1, "location": "kraken", "base_asset": "ETH",
                "quote_asset": "EUR", "trade_type": "buy",
                "amount": "{}", "rate": "250.25"}}"#,
            amount
        ))
        .unwrap()
    }

    #[test]
    fn test_query_params_defaults() {
        let params: QueryParams = serde_json::from_str("{}").unwrap();
        assert!(!params.ignore_cache);
        assert!(params.location.is_none());
    }

    #[test]
    fn test_trade_request_into_trade() {
        let trade = request("1.000000000000000001").into_trade().unwrap();
        assert_eq!(trade.amount.to_string(), "1.000000000000000001");
        assert_eq!(trade.rate.to_string(), "250.25");
        assert_eq!(trade.fee, Decimal::ZERO);
        assert_eq!(trade.location, Location::Kraken);
    }

    #[test]
    fn test_trade_request_rejects_bad_amount() {
        assert!(matches!(
            request("lots").into_trade(),
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            request("0").into_trade(),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_trade_request_rejects_out_of_range_cost() {
        let result = request(&Decimal::MAX.to_string()).into_trade();
        assert!(matches!(result, Err(Error::InvalidRequest(msg)) if msg.contains("out of range")));
    }

    #[test]
    fn test_ttl_request_deserialize() {
        let req: TtlRequest = serde_json::from_str(r#"{"ttl_secs": 0}"#).unwrap();
        assert_eq!(req.ttl_secs, 0);
    }
}
