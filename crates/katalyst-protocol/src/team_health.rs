//! Team health radar payloads (`/api/team-health/`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Traffic-light status the backend attaches to every health metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Green,
    Yellow,
    Red,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// One scored dimension of a member's health. Dimension-specific counters
/// (weekend ratio, pending reviews, churn ratio, ...) stay in `details`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamHealthMetric {
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub score: f64,
    pub status: HealthStatus,
    pub recommendation: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl TeamHealthMetric {
    pub fn detail_f64(&self, key: &str) -> Option<f64> {
        match self.details.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn detail_bool(&self, key: &str) -> bool {
        matches!(self.details.get(key), Some(Value::Bool(true)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberMetrics {
    pub workload: TeamHealthMetric,
    pub burnout_risk: TeamHealthMetric,
    pub review_latency: TeamHealthMetric,
    pub code_churn: TeamHealthMetric,
    pub collaboration: TeamHealthMetric,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverallHealth {
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub score: f64,
    pub status: HealthStatus,
    /// Letter grade such as "A+", "B" or "F".
    pub health_grade: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberHealth {
    pub id: i64,
    pub username: String,
    pub avatar_url: Option<String>,
    /// "high", "medium" or "low" attention priority.
    pub priority: String,
    pub metrics: MemberMetrics,
    pub overall_health: OverallHealth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverallStats {
    pub total_members: u64,
    pub at_risk_count: u64,
    pub warning_count: u64,
    pub healthy_count: u64,
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub avg_workload: f64,
    #[serde(deserialize_with = "crate::serde_util::loose_f64")]
    pub avg_burnout_risk: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRecommendation {
    pub priority: String,
    pub category: String,
    pub message: String,
    pub actions: Vec<String>,
}

/// Response of `/api/team-health/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamHealthReport {
    pub team_health: Vec<MemberHealth>,
    pub overall_stats: OverallStats,
    pub team_recommendations: Vec<TeamRecommendation>,
    pub last_updated: Option<String>,
}
