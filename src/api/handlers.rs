//! API Handlers
//!
//! HTTP request handlers for the ledger endpoints. Cached query results pass
//! through the checked normalizer entry points before leaving the process.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{Map, Value as JsonValue};
use tracing::info;

use crate::cache::Cacheable;
use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::models::{
    ClearResponse, HealthResponse, QueryParams, StatsResponse, TradeRequest, TradeResponse,
    TtlRequest, TtlResponse,
};
use crate::normalize::{normalize_to_mapping, normalize_to_sequence};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ledger and the cache it owns
    pub ledger: Arc<Ledger>,
}

impl AppState {
    /// Creates a new AppState around the given ledger.
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(ledger),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(Ledger::new(config.cache_ttl_secs))
    }
}

/// Runs a ledger call on the blocking pool.
///
/// Cached reads may wait on another caller computing the same result, which
/// must not stall a runtime worker.
async fn run_blocking<R, F>(state: &AppState, call: F) -> Result<R>
where
    R: Send + 'static,
    F: FnOnce(&Ledger) -> Result<R> + Send + 'static,
{
    let ledger = Arc::clone(&state.ledger);
    tokio::task::spawn_blocking(move || call(ledger.as_ref()))
        .await
        .map_err(|e| Error::Internal(format!("ledger task failed: {}", e)))?
}

/// Handler for GET /balances
pub async fn balances_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Map<String, JsonValue>>> {
    let result = run_blocking(&state, move |l| l.query_balances(params.ignore_cache)).await?;
    Ok(Json(normalize_to_mapping(&result)?))
}

/// Handler for GET /trades
pub async fn trades_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<JsonValue>>> {
    let result = run_blocking(&state, move |l| {
        l.query_trades(params.location.as_deref(), params.ignore_cache)
    })
    .await?;
    Ok(Json(normalize_to_sequence(&result)?))
}

/// Handler for GET /history
pub async fn history_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<JsonValue>>> {
    let result =
        run_blocking(&state, move |l| l.query_location_history(params.ignore_cache)).await?;
    Ok(Json(normalize_to_sequence(&result)?))
}

/// Handler for GET /version
pub async fn version_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Map<String, JsonValue>>> {
    let result = run_blocking(&state, move |l| l.query_version(params.ignore_cache)).await?;
    Ok(Json(normalize_to_mapping(&result)?))
}

/// Handler for POST /trades
///
/// Records a trade; the ledger flushes the cached reads it invalidates.
pub async fn add_trade_handler(
    State(state): State<AppState>,
    Json(req): Json<TradeRequest>,
) -> Result<Json<TradeResponse>> {
    let trade = req.into_trade()?;
    let message = format!("Trade at {} recorded", trade.location);
    let total_trades = state.ledger.add_trade(trade);

    Ok(Json(TradeResponse {
        message,
        total_trades,
    }))
}

/// Handler for PUT /cache/ttl
pub async fn set_ttl_handler(
    State(state): State<AppState>,
    Json(req): Json<TtlRequest>,
) -> Json<TtlResponse> {
    state.ledger.set_cache_ttl_secs(req.ttl_secs);
    Json(TtlResponse {
        ttl_secs: state.ledger.cache_ttl_secs(),
    })
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.ledger.results_cache().clear();
    info!("Cache cleared, {} results removed", removed);
    Json(ClearResponse::new(removed))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.ledger.results_cache();
    Json(StatsResponse::new(&cache.stats(), cache.ttl_secs()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
