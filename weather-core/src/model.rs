use serde::{Deserialize, Serialize};

/// Normalized current conditions for one city, built from a single upstream response.
///
/// Every field is optional: the upstream schema is not contractually stable,
/// so a missing key becomes `null` instead of failing the fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    /// Provider-local timestamp, passed through verbatim.
    pub local_time: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub temperature_c: Option<f64>,
    pub feelslike_c: Option<f64>,
    pub humidity: Option<u8>,
    pub wind_kph: Option<f64>,
    pub wind_dir: Option<String>,
    pub pressure_mb: Option<f64>,
    pub uv_index: Option<f64>,
    pub visibility_km: Option<f64>,
    pub condition: Option<String>,
    pub condition_icon: Option<String>,
}

/// Result of one fetch attempt.
///
/// Callers branch on the variant only; the failure reason is for humans.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(WeatherSnapshot),
    Failure(String),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::Failure(reason) => Some(reason),
        }
    }
}
