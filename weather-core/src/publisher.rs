//! Periodic-refresh streaming adapter.
//!
//! A [`Publisher`] turns repeated [`WeatherProvider`] calls into an unbounded
//! stream of [`SseFrame`]s for one subscriber:
//!
//! - `Fetching`: call the provider and emit one frame (`get_weather` or `error`),
//!   then move to `Waiting`. The first fetch happens without delay.
//! - `Waiting`: sleep for the fixed interval on the injected [`Scheduler`],
//!   then move back to `Fetching`.
//! - Closed: the subscriber drops the stream; it is never polled again.
//!
//! Failures and successes are retried after the same interval. A bad
//! iteration produces an `error` frame and never ends the stream.

use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::stream::{self, Stream};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{FetchOutcome, WeatherProvider, error::FetchError};

pub const GET_WEATHER_EVENT: &str = "get_weather";
pub const ERROR_EVENT: &str = "error";

/// Source of the delay between two fetches.
#[async_trait]
pub trait Scheduler: Send + Sync + Debug {
    async fn sleep(&self, period: Duration);
}

/// Scheduler backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn sleep(&self, period: Duration) {
        tokio::time::sleep(period).await;
    }
}

/// One server-sent event: an event name plus a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: &'static str,
    pub data: String,
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    error: &'a str,
}

impl SseFrame {
    /// Encode a fetch result. Encoding failures become an `error` frame.
    pub fn from_outcome(outcome: &FetchOutcome) -> Self {
        let encoded = match outcome {
            FetchOutcome::Success(snapshot) => {
                serde_json::to_string(snapshot).map(|data| (GET_WEATHER_EVENT, data))
            }
            FetchOutcome::Failure(reason) => {
                serde_json::to_string(&ErrorPayload { error: reason }).map(|data| (ERROR_EVENT, data))
            }
        };

        match encoded {
            Ok((event, data)) => SseFrame { event, data },
            Err(err) => Self::error(&FetchError::Serialization(err.to_string()).to_string()),
        }
    }

    pub fn error(reason: &str) -> Self {
        // A `{"error": <string>}` object always serializes.
        let data = serde_json::json!({ "error": reason }).to_string();
        SseFrame { event: ERROR_EVENT, data }
    }

    pub fn is_error(&self) -> bool {
        self.event == ERROR_EVENT
    }

    /// Reference wire form: `event: <name>\ndata: <json>\n\n`.
    ///
    /// HTTP surfaces may encode through their own SSE type but must emit these bytes.
    pub fn encode(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event, self.data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublisherState {
    Fetching,
    Waiting,
}

/// Shared factory for per-connection refresh loops.
///
/// Only the provider and scheduler are shared between subscriptions, and
/// both are read-only.
#[derive(Debug, Clone)]
pub struct Publisher {
    provider: Arc<dyn WeatherProvider>,
    scheduler: Arc<dyn Scheduler>,
    interval: Duration,
}

struct Subscription {
    provider: Arc<dyn WeatherProvider>,
    scheduler: Arc<dyn Scheduler>,
    interval: Duration,
    city: String,
    state: PublisherState,
}

impl Subscription {
    async fn next_frame(&mut self) -> SseFrame {
        loop {
            match self.state {
                PublisherState::Fetching => {
                    let outcome = self.provider.fetch_and_normalize(&self.city).await;
                    let frame = SseFrame::from_outcome(&outcome);
                    if frame.is_error() {
                        warn!(city = %self.city, data = %frame.data, "emitting error frame");
                    } else {
                        debug!(city = %self.city, "emitting weather frame");
                    }
                    self.state = PublisherState::Waiting;
                    return frame;
                }
                PublisherState::Waiting => {
                    self.scheduler.sleep(self.interval).await;
                    self.state = PublisherState::Fetching;
                }
            }
        }
    }
}

impl Publisher {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        scheduler: Arc<dyn Scheduler>,
        interval: Duration,
    ) -> Self {
        Self { provider, scheduler, interval }
    }

    /// Start a fresh, independent refresh loop for `city`.
    ///
    /// The stream never ends on its own; drop it to stop the loop.
    pub fn subscribe(&self, city: String) -> impl Stream<Item = SseFrame> + Send + use<> {
        let subscription = Subscription {
            provider: Arc::clone(&self.provider),
            scheduler: Arc::clone(&self.scheduler),
            interval: self.interval,
            city,
            state: PublisherState::Fetching,
        };
        debug!(city = %subscription.city, "starting weather stream");

        stream::unfold(subscription, |mut subscription| async move {
            let frame = subscription.next_frame().await;
            Some((frame, subscription))
        })
    }
}
