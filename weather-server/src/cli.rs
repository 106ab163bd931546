use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use weather_core::{Config, FetchOutcome, WeatherProvider, provider_from_config};
use weather_server::handlers::weather::FAILURE_MESSAGE;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Live weather pull endpoint and SSE stream")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// WeatherAPI.com key; takes precedence over the config file.
    #[arg(long, global = true, env = "WEATHERAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (`/weather/{city}`, `/sse`, `/health`).
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// City streamed by `/sse` when the request names none.
        #[arg(long)]
        city: Option<String>,

        /// Seconds between two SSE frames.
        #[arg(long)]
        interval_secs: Option<u64>,
    },

    /// Fetch current weather for a city once and print it.
    Show {
        /// City name, e.g. "Jakarta".
        city: String,
    },

    /// Interactively store the API key and defaults in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = self.load_config()?;
        if let Some(key) = self.api_key {
            config.set_api_key(key);
        }

        match self.command {
            Command::Serve { host, port, city, interval_secs } => {
                apply_serve_overrides(&mut config, host, port, city, interval_secs);
                weather_server::serve(&config).await
            }
            Command::Show { city } => show(&config, &city).await,
            Command::Configure => configure(config, self.config),
        }
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }
}

fn apply_serve_overrides(
    config: &mut Config,
    host: Option<String>,
    port: Option<u16>,
    city: Option<String>,
    interval_secs: Option<u64>,
) {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(city) = city {
        config.server.default_city = city;
    }
    if let Some(secs) = interval_secs {
        config.server.refresh_interval_secs = secs;
    }
}

async fn show(config: &Config, city: &str) -> anyhow::Result<()> {
    let provider = provider_from_config(&config.provider)?;

    match provider.fetch_and_normalize(city).await {
        FetchOutcome::Success(snapshot) => {
            let pretty = serde_json::to_string_pretty(&snapshot)
                .context("Failed to render weather snapshot")?;
            println!("{pretty}");
            Ok(())
        }
        FetchOutcome::Failure(reason) => Err(anyhow::anyhow!("{FAILURE_MESSAGE}: {reason}")),
    }
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let api_key = Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    config.provider.base_url = Text::new("Provider base URL:")
        .with_default(&config.provider.base_url)
        .prompt()
        .context("Failed to read base URL")?;

    config.server.default_city = Text::new("Default SSE city:")
        .with_default(&config.server.default_city)
        .prompt()
        .context("Failed to read default city")?;

    let saved = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved.display());
    Ok(())
}
