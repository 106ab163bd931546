//! HTTP surfaces for `weather-core`.
//!
//! - `GET /weather/{city}`: single fetch, JSON snapshot or plain-text failure
//! - `GET /sse?city=...`: periodic `get_weather` / `error` server-sent events
//! - `GET /health`: liveness probe
//!
//! Both weather routes call the same [`weather_core::WeatherProvider`].

pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use routes::create_router;
pub use server::serve;
pub use state::AppState;
