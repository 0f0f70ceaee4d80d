//! Auto-triage and chatbot payloads.

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;

/// Issue text submitted for classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

impl IssueDraft {
    pub fn validate(&self) -> Result<(), crate::ProtocolError> {
        if self.title.trim().is_empty() {
            return Err(crate::ProtocolError::InvalidInput("Title is required".into()));
        }
        Ok(())
    }
}

/// Body of `POST /api/triage/issue/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageRequest {
    pub repository_id: i64,
    pub issue_data: IssueDraft,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classification {
    /// "bug", "feature", "question", "security", ...
    #[serde(rename = "type")]
    pub kind: String,
    pub component: String,
    /// "critical", "high", "medium" or "low".
    pub priority: String,
    /// "simple", "moderate" or "complex".
    pub complexity: String,
    pub reasoning: String,
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub confidence: f64,
    /// Hours, usually a range such as "3-8".
    #[serde(deserialize_with = "crate::serde_util::loose_string")]
    pub estimated_effort: String,
    pub suggested_labels: Vec<String>,
    pub is_duplicate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateDetection {
    pub is_duplicate: bool,
    #[serde(deserialize_with = "crate::serde_util::loose_string")]
    pub duplicate_of: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssigneeAlternative {
    pub id: Option<i64>,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assignment {
    pub assignee: Option<String>,
    pub assignee_id: Option<i64>,
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub confidence: f64,
    pub reasoning: String,
    pub alternatives: Vec<AssigneeAlternative>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageResult {
    pub classification: Option<Classification>,
    pub labels: Vec<String>,
    pub duplicate_detection: Option<DuplicateDetection>,
    pub assignment: Option<Assignment>,
    /// Snake-case action identifiers, e.g. `notify_security_team`.
    pub auto_actions: Vec<String>,
}

impl TriageResult {
    /// Result of a classify-only request, which carries no duplicate or
    /// assignment data.
    pub fn from_classification(classification: Classification) -> Self {
        Self {
            classification: Some(classification),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageResponse {
    pub success: bool,
    pub error: Option<String>,
    pub triage_result: Option<TriageResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyResponse {
    pub success: bool,
    pub error: Option<String>,
    pub classification: Option<Classification>,
}

/// The four chatbot reports. Each returns a markdown document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatTopic {
    PrSummary,
    TeamHealth,
    DailyDigest,
    RiskAlerts,
}

impl ChatTopic {
    pub const ALL: [ChatTopic; 4] = [
        ChatTopic::PrSummary,
        ChatTopic::TeamHealth,
        ChatTopic::DailyDigest,
        ChatTopic::RiskAlerts,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::PrSummary => "PR Summary",
            Self::TeamHealth => "Team Health",
            Self::DailyDigest => "Daily Digest",
            Self::RiskAlerts => "Risk Alerts",
        }
    }

    /// Message shown when the backend fails without an error string.
    pub fn fallback_error(&self) -> &'static str {
        match self {
            Self::PrSummary => "Failed to get PR summary",
            Self::TeamHealth => "Failed to get team health",
            Self::DailyDigest => "Failed to get daily digest",
            Self::RiskAlerts => "Failed to get risk alerts",
        }
    }
}

/// Body of `POST /api/chatbot/pr-summary/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrSummaryRequest {
    pub pr_number: u64,
    pub repository_name: String,
}

/// A chatbot request with the parameters its topic needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatRequest {
    PrSummary(PrSummaryRequest),
    TeamHealth { repository_id: Option<i64> },
    DailyDigest,
    RiskAlerts,
}

impl ChatRequest {
    pub fn topic(&self) -> ChatTopic {
        match self {
            Self::PrSummary(_) => ChatTopic::PrSummary,
            Self::TeamHealth { .. } => ChatTopic::TeamHealth,
            Self::DailyDigest => ChatTopic::DailyDigest,
            Self::RiskAlerts => ChatTopic::RiskAlerts,
        }
    }
}

/// Any chatbot response. Which document field is populated depends on
/// the topic requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatbotResponse {
    pub success: bool,
    pub error: Option<String>,
    pub summary: Option<String>,
    pub report: Option<String>,
    pub digest: Option<String>,
    pub risks: Option<String>,
}

impl ChatbotResponse {
    pub fn document(self, topic: ChatTopic) -> Option<String> {
        match topic {
            ChatTopic::PrSummary => self.summary,
            ChatTopic::TeamHealth => self.report,
            ChatTopic::DailyDigest => self.digest,
            ChatTopic::RiskAlerts => self.risks,
        }
    }
}

impl Envelope for TriageResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Envelope for ClassifyResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Envelope for ChatbotResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triage_request_shape() {
        let req = TriageRequest {
            repository_id: 4,
            issue_data: IssueDraft {
                title: "Crash on save".into(),
                body: String::new(),
                labels: vec![],
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["repository_id"], 4);
        assert_eq!(json["issue_data"]["title"], "Crash on save");
        assert!(json["issue_data"]["labels"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_blank_title_is_invalid() {
        let draft = IssueDraft {
            title: "   ".into(),
            ..Default::default()
        };
        assert!(matches!(draft.validate(), Err(crate::ProtocolError::InvalidInput(_))));
    }

    #[test]
    fn test_chatbot_document_per_topic() {
        let resp: ChatbotResponse =
            serde_json::from_str(r##"{"success": true, "digest": "# Today"}"##).unwrap();
        assert_eq!(resp.clone().document(ChatTopic::DailyDigest).as_deref(), Some("# Today"));
        assert_eq!(resp.document(ChatTopic::RiskAlerts), None);
    }

    #[test]
    fn test_classification_effort_accepts_numbers() {
        let c: Classification =
            serde_json::from_str(r#"{"type": "bug", "estimated_effort": 4, "confidence": 0.9}"#).unwrap();
        assert_eq!(c.kind, "bug");
        assert_eq!(c.estimated_effort, "4");
    }
}
