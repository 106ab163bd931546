use crate::{FetchOutcome, config::ProviderConfig, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

/// Source of normalized weather snapshots.
///
/// This is the single function behind every surface (pull endpoint,
/// SSE publisher, CLI): one call is one upstream attempt.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for `city`. Never panics on upstream trouble;
    /// every failure is reported as [`FetchOutcome::Failure`].
    async fn fetch_and_normalize(&self, city: &str) -> FetchOutcome;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &ProviderConfig) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider = WeatherApiProvider::new(config)?;
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = ProviderConfig::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let cfg = ProviderConfig { api_key: Some("KEY".into()), ..Default::default() };
        assert!(provider_from_config(&cfg).is_ok());
    }
}
