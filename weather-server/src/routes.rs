//! Route definitions

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/weather/{city}", get(handlers::weather::get_weather))
        .route("/sse", get(handlers::sse::weather_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
