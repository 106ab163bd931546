use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::{FetchOutcome, config::ProviderConfig, error::FetchError, model::WeatherSnapshot};

use super::WeatherProvider;

/// WeatherAPI.com `current.json` client.
///
/// The inner [`Client`] carries the timeout and default headers and is only read,
/// so one provider can serve any number of concurrent fetches.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.api_key()?.to_owned();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client for WeatherAPI.com")?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(FetchError::InvalidCity);
        }

        let url = format!("{}/current.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city), ("aqi", "no")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::UpstreamHttp {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        normalize(&body)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    #[instrument(skip(self))]
    async fn fetch_and_normalize(&self, city: &str) -> FetchOutcome {
        match self.fetch_current(city).await {
            Ok(snapshot) => {
                debug!(city = ?snapshot.city, "fetched current weather");
                FetchOutcome::Success(snapshot)
            }
            Err(err) => {
                warn!(error = %err, "weather fetch failed");
                FetchOutcome::Failure(err.to_string())
            }
        }
    }
}

/// Build a snapshot from one `current.json` response body.
///
/// Missing `location`, `current` or `current.condition` objects only null out
/// their own fields. A body that is not a JSON object, or that carries neither
/// `location` nor `current`, is malformed.
pub fn normalize(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let value: Value = serde_json::from_str(body)?;

    let Some(root) = value.as_object() else {
        return Err(FetchError::MalformedResponse("expected a JSON object".into()));
    };
    let location = present(root, "location")?;
    let current = present(root, "current")?;
    if location.is_none() && current.is_none() {
        return Err(FetchError::MalformedResponse("empty response".into()));
    }
    if let Some(current) = current {
        present(current, "condition")?;
    }

    let parsed: WaResponse = serde_json::from_value(value)?;
    Ok(parsed.into())
}

/// `Some` for an object under `key`, `None` when absent or `null`.
///
/// Arrays are rejected here since serde would otherwise fill the struct by position.
fn present<'a>(
    parent: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>, FetchError> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(FetchError::MalformedResponse(format!("`{key}` is not an object"))),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaLocation {
    name: Option<String>,
    region: Option<String>,
    country: Option<String>,
    localtime: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaCondition {
    text: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaCurrent {
    temp_c: Option<f64>,
    feelslike_c: Option<f64>,
    humidity: Option<u8>,
    wind_kph: Option<f64>,
    wind_dir: Option<String>,
    pressure_mb: Option<f64>,
    uv: Option<f64>,
    vis_km: Option<f64>,
    condition: Option<WaCondition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WaResponse {
    location: Option<WaLocation>,
    current: Option<WaCurrent>,
}

impl From<WaResponse> for WeatherSnapshot {
    fn from(res: WaResponse) -> Self {
        let location = res.location.unwrap_or_default();
        let mut current = res.current.unwrap_or_default();
        let condition = current.condition.take().unwrap_or_default();

        WeatherSnapshot {
            city: location.name,
            region: location.region,
            country: location.country,
            local_time: location.localtime,
            latitude: location.lat,
            longitude: location.lon,
            temperature_c: current.temp_c,
            feelslike_c: current.feelslike_c,
            humidity: current.humidity,
            wind_kph: current.wind_kph,
            wind_dir: current.wind_dir,
            pressure_mb: current.pressure_mb,
            uv_index: current.uv,
            visibility_km: current.vis_km,
            condition: condition.text,
            condition_icon: condition.icon,
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
