//! Release readiness dashboard payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dashboard::RepositoryRef;

/// Response of `/api/release-readiness/{id}/dashboard/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseDashboard {
    pub current: ReleaseReadinessScore,
    pub trend: ReadinessTrend,
    pub action_items: ActionItems,
    pub last_updated: Option<String>,
}

/// The 0-100 quality gate computed by the backend, with its breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseReadinessScore {
    pub repository: RepositoryRef,
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub score: f64,
    pub readiness_level: ReadinessLevel,
    pub recommendation: String,
    pub can_release: bool,
    pub blockers: Vec<String>,
    pub warnings: Vec<String>,
    pub penalties: Vec<Penalty>,
    pub passed_checks: Vec<String>,
    /// Free-form counters keyed by backend metric name.
    pub detailed_metrics: Map<String, Value>,
    pub summary: ReadinessSummary,
    pub calculated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessLevel {
    /// "excellent", "good", "fair", "poor" or "critical".
    pub level: String,
    pub label: String,
    pub color: String,
    pub emoji: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Penalty {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: Option<u64>,
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub penalty: f64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessSummary {
    pub total_checks: u32,
    pub passed_checks: u32,
    pub failed_checks: u32,
    pub blockers_count: u32,
    pub warnings_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessTrend {
    pub repository_id: Option<i64>,
    pub trend: Vec<TrendPoint>,
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub current_score: f64,
    /// "improving" or "declining".
    pub trend_direction: String,
}

impl ReadinessTrend {
    /// Score change from the oldest trend point to the current score.
    pub fn delta(&self) -> Option<f64> {
        self.trend.first().map(|first| self.current_score - first.score)
    }

    pub fn is_improving(&self) -> bool {
        self.trend_direction == "improving"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPoint {
    pub date: String,
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionItems {
    pub blockers: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendation: String,
    pub next_steps: Vec<NextStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextStep {
    /// "critical", "high" or "medium".
    pub priority: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub items: Vec<String>,
}
