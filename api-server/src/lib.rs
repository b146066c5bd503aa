// dexcandles API server - validating, caching, fault-tolerant candle endpoint
pub mod cache;
pub mod candles;
pub mod handlers;
pub mod response;
pub mod schema;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router: the candle endpoint, health and metrics,
/// and an envelope-shaped 404 fallback for everything else. A panic
/// anywhere below still surfaces as a 500 envelope.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/candles", get(handlers::candles::get_candles))
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::prometheus_metrics))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handlers::handle_panic))
}
