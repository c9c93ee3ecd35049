//! Response DTOs for the ledger API
//!
//! Defines the structure of outgoing HTTP response bodies that are not
//! normalized query results.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub bypasses: u64,
    pub failures: u64,
    pub flushes: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    pub ttl_secs: u64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, ttl_secs: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            bypasses: stats.bypasses,
            failures: stats.failures,
            flushes: stats.flushes,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            ttl_secs,
        }
    }
}

/// Response body for PUT /cache/ttl
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub ttl_secs: u64,
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Removed {} cached results", removed),
            removed,
        }
    }
}

/// Response body for POST /trades
#[derive(Debug, Clone, Serialize)]
pub struct TradeResponse {
    pub message: String,
    pub total_trades: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..CacheStats::default()
        };
        let resp = StatsResponse::new(&stats, 600);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.ttl_secs, 600);
    }

    #[test]
    fn test_clear_response_message() {
        let resp = ClearResponse::new(3);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Removed 3"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
