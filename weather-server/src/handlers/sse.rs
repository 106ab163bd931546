//! Server-sent weather stream

use std::convert::Infallible;

use axum::{
    extract::{Query, State},
    response::sse::{Event, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tracing::info;
use weather_core::SseFrame;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub city: Option<String>,
}

/// Logs when axum drops the response stream, i.e. the client went away.
#[derive(Debug)]
struct ConnectionGuard {
    city: String,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        info!(city = %self.city, "SSE connection closed");
    }
}

/// `GET /sse?city=...`: one independent refresh loop per connection.
pub async fn weather_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let city = query
        .city
        .map(|city| city.trim().to_string())
        .filter(|city| !city.is_empty())
        .unwrap_or_else(|| state.default_city.clone());

    info!(%city, "SSE connection established");
    let guard = ConnectionGuard { city: city.clone() };
    let frames = Box::pin(state.publisher.subscribe(city));

    // The guard lives in the stream state and drops with it.
    let events = stream::unfold((frames, guard), |(mut frames, guard)| async move {
        let frame = frames.next().await?;
        Some((Ok(to_event(frame)), (frames, guard)))
    });

    Sse::new(events)
}

/// Map a publisher frame onto axum's event type.
///
/// Produces the same bytes as [`SseFrame::encode`].
pub fn to_event(frame: SseFrame) -> Event {
    Event::default().event(frame.event).data(frame.data)
}
