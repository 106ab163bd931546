//! Application state shared across handlers

use std::sync::Arc;

use weather_core::{Publisher, WeatherProvider};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upstream fetcher used by the pull endpoint
    pub provider: Arc<dyn WeatherProvider>,
    /// Refresh-loop factory used by the SSE endpoint
    pub publisher: Arc<Publisher>,
    /// City streamed when `/sse` is called without one
    pub default_city: String,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        publisher: Publisher,
        default_city: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            publisher: Arc::new(publisher),
            default_city: default_city.into(),
        }
    }
}
