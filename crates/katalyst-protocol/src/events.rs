//! Live activity events delivered over `/api/events/stream/`.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::serde_util::{loose_string, loose_strings, loose_u64};

/// Event type tag of a live event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Push,
    PullRequest,
    Issues,
    /// Sent once by the server when the stream opens.
    Connected,
    /// Keep-alive, roughly once per second.
    Heartbeat,
    #[default]
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Control events describe the stream itself, not repository activity.
    pub fn is_control(&self) -> bool {
        matches!(self, Self::Connected | Self::Heartbeat)
    }
}

/// One decoded SSE `data:` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub data: Value,
    pub message: Option<String>,
    /// Unix seconds.
    pub timestamp: i64,
}

impl LiveEvent {
    pub fn from_json(payload: &str) -> Result<Self, crate::ProtocolError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Server timestamp, or `None` when absent or out of range.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp <= 0 {
            return None;
        }
        Utc.timestamp_opt(self.timestamp, 0).single()
    }

    /// Decode `data` according to `kind`. Missing or mistyped fields take
    /// defaults; only a non-object `data` blanks the whole payload.
    pub fn payload(&self) -> EventPayload {
        fn decode<T: for<'de> Deserialize<'de> + Default>(data: &Value) -> T {
            serde_json::from_value(data.clone()).unwrap_or_default()
        }
        match self.kind {
            EventKind::Push => EventPayload::Push(decode(&self.data)),
            EventKind::PullRequest => EventPayload::PullRequest(decode(&self.data)),
            EventKind::Issues => EventPayload::Issues(decode(&self.data)),
            _ => EventPayload::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushActivity {
    #[serde(deserialize_with = "loose_string")]
    pub author: String,
    #[serde(deserialize_with = "loose_u64")]
    pub commits: u64,
    #[serde(deserialize_with = "loose_string")]
    pub repository: String,
    #[serde(deserialize_with = "loose_string")]
    pub branch: String,
    #[serde(deserialize_with = "loose_strings")]
    pub commit_messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestActivity {
    #[serde(deserialize_with = "loose_string")]
    pub author: String,
    #[serde(deserialize_with = "loose_string")]
    pub action: String,
    #[serde(deserialize_with = "loose_u64")]
    pub number: u64,
    #[serde(deserialize_with = "loose_string")]
    pub title: String,
    #[serde(deserialize_with = "loose_string")]
    pub repository: String,
    #[serde(deserialize_with = "loose_string")]
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueActivity {
    #[serde(deserialize_with = "loose_string")]
    pub action: String,
    #[serde(deserialize_with = "loose_u64")]
    pub issue_number: u64,
    #[serde(deserialize_with = "loose_string")]
    pub title: String,
    #[serde(deserialize_with = "loose_string")]
    pub repository: String,
    #[serde(deserialize_with = "loose_string")]
    pub author: String,
    #[serde(deserialize_with = "loose_string")]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Push(PushActivity),
    PullRequest(PullRequestActivity),
    Issues(IssueActivity),
    Unknown,
}

impl EventPayload {
    /// Headline used for desktop notifications. `None` for events that do
    /// not notify.
    pub fn notification_title(&self) -> Option<&'static str> {
        match self {
            Self::Push(_) => Some("New Commits Pushed"),
            Self::PullRequest(_) => Some("Pull Request Activity"),
            Self::Issues(_) => Some("Issue Activity"),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for EventPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push(p) => {
                let plural = if p.commits == 1 { "" } else { "s" };
                write!(
                    f,
                    "{} pushed {} commit{} to {}",
                    p.author, p.commits, plural, p.repository
                )
            }
            Self::PullRequest(p) => {
                write!(f, "{} {} PR #{}: {}", p.author, p.action, p.number, p.title)
            }
            Self::Issues(i) => {
                write!(f, "Issue #{} {} in {}", i.issue_number, i.action, i.repository)
            }
            Self::Unknown => write!(f, "Unknown event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_event_message() {
        let event = LiveEvent::from_json(
            r#"{"type": "push", "data": {"author": "ada", "commits": 3, "repository": "engine"}, "timestamp": 1700000000}"#,
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::Push);
        assert_eq!(event.occurred_at().unwrap().timestamp(), 1_700_000_000);
        assert_eq!(event.payload().to_string(), "ada pushed 3 commits to engine");
    }

    #[test]
    fn test_single_commit_is_singular() {
        let event = LiveEvent::from_json(
            r#"{"type": "push", "data": {"author": "ada", "commits": 1, "repository": "engine"}}"#,
        )
        .unwrap();
        assert_eq!(event.payload().to_string(), "ada pushed 1 commit to engine");
    }

    #[test]
    fn test_control_and_unknown_kinds() {
        let hb = LiveEvent::from_json(r#"{"type": "heartbeat", "timestamp": 1}"#).unwrap();
        assert!(hb.kind.is_control());
        assert!(LiveEvent::default().occurred_at().is_none());

        let other = LiveEvent::from_json(r#"{"type": "release", "data": {}}"#).unwrap();
        assert_eq!(other.kind, EventKind::Other);
        assert_eq!(other.payload(), EventPayload::Unknown);
        assert_eq!(other.payload().notification_title(), None);
        assert_eq!(other.payload().to_string(), "Unknown event");
    }

    #[test]
    fn test_pull_request_and_issue_messages() {
        let pr = LiveEvent::from_json(
            r#"{"type": "pull_request", "data": {"author": "lin", "action": "opened", "number": 42, "title": "Add cache"}}"#,
        )
        .unwrap();
        assert_eq!(pr.payload().to_string(), "lin opened PR #42: Add cache");

        let issue = LiveEvent::from_json(
            r#"{"type": "issues", "data": {"action": "closed", "issue_number": 7, "repository": "engine"}}"#,
        )
        .unwrap();
        assert_eq!(issue.payload().to_string(), "Issue #7 closed in engine");
    }

    #[test]
    fn test_mistyped_field_keeps_the_rest() {
        let push = LiveEvent::from_json(
            r#"{"type": "push", "data": {"author": "ada", "commits": "2", "repository": "engine", "branch": null, "commit_messages": null}}"#,
        )
        .unwrap();
        assert_eq!(push.payload().to_string(), "ada pushed 2 commits to engine");

        let pr = LiveEvent::from_json(
            r#"{"type": "pull_request", "data": {"author": "lin", "action": "merged", "number": 9, "title": null}}"#,
        )
        .unwrap();
        assert_eq!(pr.payload().to_string(), "lin merged PR #9: ");
    }
}
