//! API Routes
//!
//! Configures the Axum router with all ledger endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_trade_handler, balances_handler, clear_cache_handler, health_handler, history_handler,
    set_ttl_handler, stats_handler, trades_handler, version_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /balances` - Net holdings per asset
/// - `GET /trades` - Trades, `?location=` filters
/// - `POST /trades` - Record a trade
/// - `GET /history` - USD value per location
/// - `GET /version` - Version check
/// - `PUT /cache/ttl` - Change the cache TTL
/// - `DELETE /cache` - Drop every cached result
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// Every cached read accepts `?ignore_cache=true`.
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/balances", get(balances_handler))
        .route("/trades", get(trades_handler).post(add_trade_handler))
        .route("/history", get(history_handler))
        .route("/version", get(version_handler))
        .route("/cache/ttl", put(set_ttl_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::new(Ledger::new(600)))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_balances_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/balances?ignore_cache=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_trades_unknown_location() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/trades?location=mtgox")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
