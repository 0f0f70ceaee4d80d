//! Katalyst Client - configuration, REST client and live activity stream
//!
//! `KatalystClient` wraps every backend endpoint. `live_feed` consumes the
//! server-sent event stream and keeps a bounded, newest-first activity feed.

pub mod client;
pub mod config;
pub mod error;
pub mod import;
pub mod live_feed;
pub mod notify;
pub mod sse;

pub use client::KatalystClient;
pub use config::Config;
pub use error::ClientError;
pub use live_feed::{spawn_live_feed, FeedEntry, FeedStatus, LiveFeed, LiveFeedHandle, LiveStream};
pub use notify::{BellNotifier, Notification, Notifier, TracingNotifier};
pub use sse::{SseEvent, SseParser};
