//! Notifications raised for live repository activity.

use std::io::Write;

use katalyst_protocol::LiveEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    /// Push, pull request and issue events notify; everything else is silent.
    pub fn for_event(event: &LiveEvent) -> Option<Self> {
        let payload = event.payload();
        let title = payload.notification_title()?;
        Some(Self {
            title: title.to_string(),
            body: payload.to_string(),
        })
    }
}

/// Sink for live notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Records notifications in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: &Notification) {
        tracing::info!(title = %n.title, body = %n.body, "live notification");
    }
}

/// Rings the terminal bell, then logs like [`TracingNotifier`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn notify(&self, n: &Notification) {
        let mut out = std::io::stderr();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            tracing::debug!(error = %e, "terminal bell failed");
        }
        TracingNotifier.notify(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(raw: &str) -> LiveEvent {
        LiveEvent::from_json(raw).unwrap()
    }

    #[test]
    fn test_push_notification() {
        let n = Notification::for_event(&event(
            r#"{"type": "push", "data": {"author": "ada", "commits": 2, "repository": "engine"}}"#,
        ))
        .unwrap();
        assert_eq!(n.title, "New Commits Pushed");
        assert_eq!(n.body, "ada pushed 2 commits to engine");
    }

    #[test]
    fn test_issue_notification_names_number_and_repository() {
        let n = Notification::for_event(&event(
            r#"{"type": "issues", "data": {"action": "opened", "issue_number": 4, "repository": "engine", "author": "lin", "title": "Crash"}}"#,
        ))
        .unwrap();
        assert_eq!(n.title, "Issue Activity");
        assert_eq!(n.body, "Issue #4 opened in engine");
    }

    #[test]
    fn test_other_events_are_silent() {
        assert!(Notification::for_event(&event(r#"{"type": "release"}"#)).is_none());
        assert!(Notification::for_event(&event(r#"{"type": "heartbeat"}"#)).is_none());
    }
}
