//! Live activity feed backed by `/api/events/stream/`.
//!
//! One connection, no reconnect. A transport error or the end of the
//! stream leaves the feed `Disconnected` and ends the task. Dropping the
//! [`LiveFeedHandle`] aborts the task and closes the connection.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::{Stream, StreamExt};
use katalyst_protocol::{LiveEvent, LIVE_FEED_CAPACITY};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::notify::{Notification, Notifier};
use crate::sse::SseParser;
use crate::{ClientError, KatalystClient};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Connecting,
    Connected,
    /// Carries the transport error, if the stream did not simply end.
    Disconnected(Option<String>),
}

impl std::fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Live"),
            Self::Disconnected(None) => write!(f, "Disconnected"),
            Self::Disconnected(Some(e)) => write!(f, "Disconnected: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub event: LiveEvent,
    pub received_at: DateTime<Utc>,
}

impl FeedEntry {
    /// Server timestamp when present, otherwise arrival time.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.event.occurred_at().unwrap_or(self.received_at)
    }

    pub fn message(&self) -> String {
        self.event.payload().to_string()
    }
}

/// Bounded, newest-first list of repository activity.
#[derive(Debug, Clone)]
pub struct LiveFeed {
    entries: VecDeque<FeedEntry>,
    capacity: usize,
    status: FeedStatus,
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self::with_capacity(LIVE_FEED_CAPACITY)
    }
}

impl LiveFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            status: FeedStatus::Connecting,
        }
    }

    /// Record one event. Control events only flip the status; returns
    /// whether the event was retained.
    pub fn ingest(&mut self, event: LiveEvent, now: DateTime<Utc>) -> bool {
        self.status = FeedStatus::Connected;
        if event.kind.is_control() {
            return false;
        }
        self.entries.push_front(FeedEntry {
            event,
            received_at: now,
        });
        self.entries.truncate(self.capacity);
        true
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == FeedStatus::Connected
    }

    pub fn set_status(&mut self, status: FeedStatus) {
        self.status = status;
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// Decoded live events from one open connection.
pub struct LiveStream {
    body: ByteStream,
    parser: SseParser,
    ready: VecDeque<LiveEvent>,
}

impl LiveStream {
    pub async fn connect(client: &KatalystClient) -> Result<Self, ClientError> {
        let resp = client.open_event_stream().await?;
        Ok(Self::from_stream(resp.bytes_stream()))
    }

    pub fn from_stream<S>(body: S) -> Self
    where
        S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
    {
        Self {
            body: Box::pin(body),
            parser: SseParser::new(),
            ready: VecDeque::new(),
        }
    }

    /// Next event, `None` once the server closes the stream. Payloads that
    /// are not JSON are skipped.
    pub async fn next_event(&mut self) -> Option<Result<LiveEvent, ClientError>> {
        loop {
            if let Some(event) = self.ready.pop_front() {
                return Some(Ok(event));
            }
            let chunk = match self.body.next().await? {
                Ok(chunk) => chunk,
                Err(e) => return Some(Err(e.into())),
            };
            for sse in self.parser.push(&chunk) {
                match LiveEvent::from_json(&sse.data) {
                    Ok(event) => self.ready.push_back(event),
                    Err(e) => tracing::debug!(error = %e, data = %sse.data, "dropping non-JSON event"),
                }
            }
        }
    }
}

/// Owns the background stream task. Dropping it closes the connection.
pub struct LiveFeedHandle {
    task: JoinHandle<()>,
}

impl LiveFeedHandle {
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for LiveFeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Stream events into `feed` until the connection ends.
pub fn spawn_live_feed(
    client: KatalystClient,
    feed: Arc<RwLock<LiveFeed>>,
    notifier: Option<Arc<dyn Notifier>>,
) -> LiveFeedHandle {
    let task = tokio::spawn(async move {
        feed.write().await.set_status(FeedStatus::Connecting);
        let mut stream = match LiveStream::connect(&client).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "live stream connection failed");
                feed.write().await.set_status(FeedStatus::Disconnected(Some(e.to_string())));
                return;
            }
        };

        let outcome = loop {
            match stream.next_event().await {
                Some(Ok(event)) => {
                    if let (Some(notifier), Some(n)) = (&notifier, Notification::for_event(&event)) {
                        notifier.notify(&n);
                    }
                    feed.write().await.ingest(event, Utc::now());
                }
                Some(Err(e)) => break Some(e.to_string()),
                None => break None,
            }
        };

        match &outcome {
            Some(e) => tracing::warn!(error = %e, "live stream failed"),
            None => tracing::info!("live stream closed by server"),
        }
        feed.write().await.set_status(FeedStatus::Disconnected(outcome));
    });
    LiveFeedHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(author: &str) -> LiveEvent {
        LiveEvent::from_json(&format!(
            r#"{{"type": "push", "data": {{"author": "{author}", "commits": 1, "repository": "engine"}}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_feed_is_bounded_newest_first() {
        let mut feed = LiveFeed::new();
        for i in 0..25 {
            assert!(feed.ingest(push(&format!("dev{i}")), Utc::now()));
        }
        assert_eq!(feed.len(), LIVE_FEED_CAPACITY);
        let first = feed.entries().next().unwrap();
        assert_eq!(first.message(), "dev24 pushed 1 commit to engine");
        let last = feed.entries().last().unwrap();
        assert_eq!(last.message(), "dev5 pushed 1 commit to engine");
    }

    #[test]
    fn test_control_events_connect_without_retention() {
        let mut feed = LiveFeed::new();
        assert_eq!(feed.status(), &FeedStatus::Connecting);
        let hb = LiveEvent::from_json(r#"{"type": "heartbeat", "timestamp": 1}"#).unwrap();
        assert!(!feed.ingest(hb, Utc::now()));
        assert!(feed.is_connected());
        assert!(feed.is_empty());
    }

    #[test]
    fn test_entry_timestamp_prefers_server_time() {
        let mut feed = LiveFeed::new();
        let event = LiveEvent::from_json(r#"{"type": "issues", "timestamp": 1700000000}"#).unwrap();
        feed.ingest(event, Utc::now());
        assert_eq!(feed.entries().next().unwrap().timestamp().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FeedStatus::Connected.to_string(), "Live");
        assert_eq!(
            FeedStatus::Disconnected(Some("reset".into())).to_string(),
            "Disconnected: reset"
        );
    }
}
