//! Refresh-loop behavior with a stubbed provider and injected schedulers.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use futures::StreamExt;
use weather_core::{
    FetchOutcome, Publisher, Scheduler, SseFrame, TokioScheduler, WeatherProvider, WeatherSnapshot,
};

const INTERVAL: Duration = Duration::from_secs(60);

/// Replays a script of outcomes, repeating the last one once exhausted.
#[derive(Debug)]
struct ScriptedProvider {
    script: Mutex<VecDeque<FetchOutcome>>,
    last: Mutex<Option<FetchOutcome>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(script: Vec<FetchOutcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for ScriptedProvider {
    async fn fetch_and_normalize(&self, _city: &str) -> FetchOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(outcome) = next {
            *last = Some(outcome);
        }
        last.clone().unwrap_or_else(|| FetchOutcome::Failure("empty script".into()))
    }
}

/// Records requested delays and returns immediately.
#[derive(Debug, Default)]
struct RecordingScheduler {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingScheduler {
    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Scheduler for RecordingScheduler {
    async fn sleep(&self, period: Duration) {
        self.sleeps.lock().unwrap().push(period);
    }
}

fn jakarta() -> WeatherSnapshot {
    WeatherSnapshot {
        city: Some("Jakarta".into()),
        temperature_c: Some(30.0),
        condition: Some("Sunny".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn first_frame_is_emitted_without_delay() {
    let provider = Arc::new(ScriptedProvider::new(vec![FetchOutcome::Success(jakarta())]));
    let scheduler = Arc::new(RecordingScheduler::default());
    let publisher = Publisher::new(provider.clone(), scheduler.clone(), INTERVAL);

    let mut stream = Box::pin(publisher.subscribe("Jakarta".into()));
    let frame = stream.next().await.unwrap();

    assert_eq!(frame.event, "get_weather");
    assert_eq!(provider.calls(), 1);
    assert!(scheduler.sleeps().is_empty());
}

#[tokio::test]
async fn every_following_frame_waits_one_interval() {
    let provider = Arc::new(ScriptedProvider::new(vec![FetchOutcome::Success(jakarta())]));
    let scheduler = Arc::new(RecordingScheduler::default());
    let publisher = Publisher::new(provider.clone(), scheduler.clone(), INTERVAL);

    let frames: Vec<SseFrame> = publisher.subscribe("Jakarta".into()).take(4).collect().await;

    assert_eq!(frames.len(), 4);
    assert_eq!(provider.calls(), 4);
    assert_eq!(scheduler.sleeps(), vec![INTERVAL; 3]);
}

#[tokio::test]
async fn failing_iteration_does_not_end_the_stream() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        FetchOutcome::Failure("upstream returned HTTP 502: bad gateway".into()),
        FetchOutcome::Success(jakarta()),
    ]));
    let scheduler = Arc::new(RecordingScheduler::default());
    let publisher = Publisher::new(provider, scheduler.clone(), INTERVAL);

    let frames: Vec<SseFrame> = publisher.subscribe("Jakarta".into()).take(2).collect().await;

    assert_eq!(frames[0].event, "error");
    assert_eq!(frames[0].data, r#"{"error":"upstream returned HTTP 502: bad gateway"}"#);
    assert_eq!(frames[1].event, "get_weather");
    assert_eq!(frames[1].data, serde_json::to_string(&jakarta()).unwrap());
    // Failure retries after the same interval as success.
    assert_eq!(scheduler.sleeps(), vec![INTERVAL]);
}

#[tokio::test]
async fn subscriptions_are_independent() {
    let provider = Arc::new(ScriptedProvider::new(vec![FetchOutcome::Success(jakarta())]));
    let scheduler = Arc::new(RecordingScheduler::default());
    let publisher = Publisher::new(provider.clone(), scheduler.clone(), INTERVAL);

    let mut first = Box::pin(publisher.subscribe("Jakarta".into()));
    let mut second = Box::pin(publisher.subscribe("Bandung".into()));

    first.next().await.unwrap();
    first.next().await.unwrap();
    second.next().await.unwrap();

    // The second subscription starts at its own `Fetching` state.
    assert_eq!(provider.calls(), 3);
    assert_eq!(scheduler.sleeps().len(), 1);
}

#[tokio::test]
async fn dropping_the_stream_stops_fetching() {
    let provider = Arc::new(ScriptedProvider::new(vec![FetchOutcome::Success(jakarta())]));
    let publisher = Publisher::new(provider.clone(), Arc::new(RecordingScheduler::default()), INTERVAL);

    let mut stream = Box::pin(publisher.subscribe("Jakarta".into()));
    stream.next().await.unwrap();
    drop(stream);

    tokio::task::yield_now().await;
    assert_eq!(provider.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn frame_count_follows_elapsed_intervals() {
    let provider = Arc::new(ScriptedProvider::new(vec![FetchOutcome::Success(jakarta())]));
    let publisher = Publisher::new(provider, Arc::new(TokioScheduler), INTERVAL);

    let mut stream = Box::pin(publisher.subscribe("Jakarta".into()));
    let mut count = 0usize;
    let lifetime = Duration::from_secs(150);

    let _ = tokio::time::timeout(lifetime, async {
        while stream.next().await.is_some() {
            count += 1;
        }
    })
    .await;

    // 1 + floor(150 / 60)
    assert_eq!(count, 3);
}
