//! Ledger
//!
//! In-memory trade ledger whose read queries are memoized in its own cache
//! store. Writes flush the results they invalidate.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::cache::{CacheStore, Cacheable, Cached, CallArgs, Clock, SystemClock};
use crate::error::{Error, Result};
use crate::models::{Asset, Balance, Location, LocationData, Trade, TradeType, VersionInfo};
use crate::normalize::{Key, Value};

const QUERY_BALANCES: &str = "query_balances";
const QUERY_TRADES: &str = "query_trades";
const QUERY_HISTORY: &str = "query_location_history";
const QUERY_VERSION: &str = "query_version";

// == Ledger ==
/// Owner of trades, USD prices and a result cache.
pub struct Ledger {
    trades: RwLock<Vec<Trade>>,
    /// USD price per asset; unknown assets are valued at zero
    prices: RwLock<HashMap<Asset, Decimal>>,
    results_cache: CacheStore<Value>,
}

impl Ledger {
    // == Constructor ==
    pub fn new(cache_ttl_secs: u64) -> Self {
        Self::with_clock(cache_ttl_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(cache_ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            trades: RwLock::new(Vec::new()),
            prices: RwLock::new(HashMap::new()),
            results_cache: CacheStore::with_clock(cache_ttl_secs, clock),
        }
    }

    // == Writes ==
    /// Records a trade and flushes the cached reads it affects.
    ///
    /// Returns the number of trades held afterwards.
    pub fn add_trade(&self, trade: Trade) -> usize {
        let location = trade.location;
        let total = {
            let mut trades = self.trades.write();
            trades.push(trade);
            trades.len()
        };

        self.flush_cache(QUERY_TRADES, &CallArgs::new());
        self.flush_cache(
            QUERY_TRADES,
            &CallArgs::new().kwarg("location", location.to_string()),
        );
        self.flush_cache(QUERY_BALANCES, &CallArgs::new());
        self.flush_cache(QUERY_HISTORY, &CallArgs::new());
        info!("Trade recorded at {}, {} trades held", location, total);
        total
    }

    /// Sets the USD price of an asset.
    ///
    /// Cached balances keep the old valuation until they expire or are
    /// queried with `ignore_cache`.
    pub fn set_price(&self, asset: Asset, usd_price: Decimal) {
        self.prices.write().insert(asset, usd_price);
    }

    pub fn trade_count(&self) -> usize {
        self.trades.read().len()
    }

    // == Cached Reads ==
    /// Net holdings per asset, keyed by asset.
    pub fn query_balances(&self, ignore_cache: bool) -> Result<Value> {
        Cached::new(QUERY_BALANCES, Ledger::compute_balances)
            .arguments_matter(false)
            .invoke(self, &CallArgs::new(), ignore_cache)
    }

    /// Trades, optionally restricted to one location.
    pub fn query_trades(&self, location: Option<&str>, ignore_cache: bool) -> Result<Value> {
        let args = match location {
            Some(location) => CallArgs::new().kwarg("location", location),
            None => CallArgs::new(),
        };
        Cached::new(QUERY_TRADES, Ledger::compute_trades).invoke(self, &args, ignore_cache)
    }

    /// USD value traded per location, one row per location.
    pub fn query_location_history(&self, ignore_cache: bool) -> Result<Value> {
        Cached::new(QUERY_HISTORY, Ledger::compute_location_history)
            .arguments_matter(false)
            .invoke(self, &CallArgs::new(), ignore_cache)
    }

    /// Version check; a bypass is forwarded so a forced refresh is visible.
    pub fn query_version(&self, ignore_cache: bool) -> Result<Value> {
        Cached::new(QUERY_VERSION, Ledger::compute_version)
            .arguments_matter(false)
            .forward_ignore_cache(true)
            .invoke(self, &CallArgs::new(), ignore_cache)
    }

    // == Underlying Operations ==
    fn compute_balances(&self, _args: &CallArgs, _ignore_cache: bool) -> Result<Value> {
        let trades = self.trades.read();
        let mut holdings: BTreeMap<Asset, Decimal> = BTreeMap::new();

        for trade in trades.iter() {
            let cost = trade.amount.checked_mul(trade.rate).ok_or_else(|| overflow("cost"))?;
            let (base_delta, quote_delta) = match trade.trade_type {
                TradeType::Buy => (trade.amount, cost.checked_add(trade.fee).map(|spent| -spent)),
                TradeType::Sell => (-trade.amount, cost.checked_sub(trade.fee)),
            };
            let quote_delta = quote_delta.ok_or_else(|| overflow("cost"))?;
            accumulate(holdings.entry(trade.base.clone()).or_default(), base_delta)?;
            accumulate(holdings.entry(trade.quote.clone()).or_default(), quote_delta)?;
        }

        let prices = self.prices.read();
        let entries = holdings
            .into_iter()
            .map(|(asset, amount)| {
                let price = prices.get(&asset).copied().unwrap_or_default();
                let usd_value = amount.checked_mul(price).ok_or_else(|| overflow("usd value"))?;
                let balance = Balance::new(amount, usd_value);
                Ok((Key::identifier(&asset), Value::serializable(balance)))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!("Computed balances over {} trades", trades.len());
        Ok(Value::Map(entries))
    }

    fn compute_trades(&self, args: &CallArgs, _ignore_cache: bool) -> Result<Value> {
        let location = match args.keyword("location") {
            Some(raw) => {
                let raw = raw.as_str().ok_or_else(|| {
                    Error::InvalidRequest("location must be a string".to_string())
                })?;
                Some(raw.parse::<Location>()?)
            }
            None => None,
        };

        let trades = self.trades.read();
        let selected = trades
            .iter()
            .filter(|trade| location.map_or(true, |l| trade.location == l))
            .map(|trade| Value::record(trade.clone()))
            .collect();
        Ok(Value::List(selected))
    }

    fn compute_location_history(&self, _args: &CallArgs, _ignore_cache: bool) -> Result<Value> {
        let trades = self.trades.read();
        let prices = self.prices.read();
        let mut per_location: BTreeMap<Location, LocationData> = BTreeMap::new();

        for trade in trades.iter() {
            let price = prices.get(&trade.base).copied().unwrap_or_default();
            let row = per_location.entry(trade.location).or_insert(LocationData {
                time: trade.timestamp,
                location: trade.location,
                usd_value: Decimal::ZERO,
            });
            row.time = row.time.max(trade.timestamp);
            let usd_value = trade.amount.checked_mul(price).ok_or_else(|| overflow("usd value"))?;
            accumulate(&mut row.usd_value, usd_value)?;
        }

        Ok(Value::List(per_location.values().map(Value::from).collect()))
    }

    fn compute_version(&self, _args: &CallArgs, ignore_cache: bool) -> Result<Value> {
        if ignore_cache {
            debug!("Version check forced past the cache");
        }
        Ok(Value::serializable(VersionInfo {
            our_version: env!("CARGO_PKG_VERSION").to_string(),
            latest_version: None,
            download_url: None,
        }))
    }
}

fn overflow(what: &str) -> Error {
    Error::Internal(format!("{} out of decimal range", what))
}

fn accumulate(total: &mut Decimal, delta: Decimal) -> Result<()> {
    *total = total.checked_add(delta).ok_or_else(|| overflow("running total"))?;
    Ok(())
}

impl Cacheable<Value> for Ledger {
    fn results_cache(&self) -> &CacheStore<Value> {
        &self.results_cache
    }
}
