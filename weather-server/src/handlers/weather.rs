//! Single-shot pull endpoint

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;
use weather_core::{FetchOutcome, WeatherProvider};

use crate::state::AppState;

pub const FAILURE_MESSAGE: &str = "Failed to fetch weather data";

/// `GET /weather/{city}`: one fetch, one response.
///
/// Success is the snapshot as JSON. Failure is a plain-text message with
/// `502 Bad Gateway`; there is no structured error body on this route.
#[instrument(skip(state))]
pub async fn get_weather(State(state): State<AppState>, Path(city): Path<String>) -> Response {
    match state.provider.fetch_and_normalize(&city).await {
        FetchOutcome::Success(snapshot) => Json(snapshot).into_response(),
        FetchOutcome::Failure(reason) => {
            (StatusCode::BAD_GATEWAY, format!("{FAILURE_MESSAGE}: {reason}")).into_response()
        }
    }
}
