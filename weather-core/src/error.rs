//! Failure taxonomy of the upstream fetcher.
//!
//! These never leave the fetcher: [`crate::WeatherProvider::fetch_and_normalize`]
//! renders them into [`crate::FetchOutcome::Failure`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connecting to or talking with the provider failed
    #[error("network error: {0}")]
    Network(String),

    /// The attempt exceeded its time budget
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Provider answered with a non-2xx status
    #[error("upstream returned HTTP {status}: {body}")]
    UpstreamHttp { status: u16, body: String },

    /// Body was not JSON or did not have the expected shape
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// Internal encoding failure
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("city must not be empty")]
    InvalidCity,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if err.is_decode() {
            FetchError::MalformedResponse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_http_message_names_status() {
        let err = FetchError::UpstreamHttp { status: 503, body: "busy".into() };
        assert_eq!(err.to_string(), "upstream returned HTTP 503: busy");
    }

    #[test]
    fn json_errors_are_malformed_responses() {
        let err: FetchError = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err().into();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }
}
