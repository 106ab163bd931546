//! Core library for the weather server.
//!
//! This crate defines:
//! - Configuration loading and persistence
//! - The upstream fetcher ([`WeatherProvider`]) and its WeatherAPI.com implementation
//! - The normalized data model ([`WeatherSnapshot`], [`FetchOutcome`])
//! - The periodic-refresh SSE [`Publisher`]
//!
//! It has no HTTP-server dependency; `weather-server` adapts it to axum and the CLI.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod publisher;

pub use config::{Config, ProviderConfig, ServerConfig};
pub use error::FetchError;
pub use model::{FetchOutcome, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config, weatherapi::WeatherApiProvider};
pub use publisher::{Publisher, PublisherState, Scheduler, SseFrame, TokioScheduler};
