//! Dashboard, leaderboard, commit analytics and per-contributor payloads.

use serde::{Deserialize, Serialize};

use crate::entities::Badge;

/// Response of `/api/dashboard/stats/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub totals: DashboardTotals,
    pub top_repositories: Vec<TopRepository>,
    pub recent_activities: Vec<RecentActivity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardTotals {
    pub contributors: u64,
    pub repositories: u64,
    pub commits: u64,
    pub issues: u64,
    pub active_contributors: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopRepository {
    pub id: i64,
    pub name: String,
    pub health_score: f64,
    pub stars: u64,
    pub avatar_url: String,
}

/// One entry of the activity log, flattened by the backend with Django
/// double-underscore field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentActivity {
    #[serde(rename = "contributor__username")]
    pub contributor_username: String,
    #[serde(rename = "contributor__avatar_url")]
    pub contributor_avatar_url: String,
    #[serde(rename = "repository__name")]
    pub repository_name: String,
    /// "commit" or "issue".
    pub activity_type: String,
    pub timestamp: Option<String>,
}

/// Response of `/api/dashboard/trends/?days=N`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityTrends {
    pub commits: Vec<DayCount>,
    pub issues: Vec<DayCount>,
}

impl ActivityTrends {
    pub fn total_commits(&self) -> u64 {
        self.commits.iter().map(|d| d.count).sum()
    }

    pub fn total_issues(&self) -> u64 {
        self.issues.iter().map(|d| d.count).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayCount {
    #[serde(deserialize_with = "crate::serde_util::loose_string")]
    pub day: String,
    pub count: u64,
}

/// Response of `/api/leaderboard/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub username: String,
    pub avatar_url: String,
    pub total_score: i64,
    pub level: u32,
    pub activity_streak: u32,
    pub total_commits: u64,
    pub total_issues_closed: u64,
    pub total_prs_reviewed: u64,
}

/// Response of `/api/contributors/{id}/stats/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorStats {
    pub contributor: ContributorProfile,
    pub metrics: ContributorMetrics,
    pub badges: Vec<Badge>,
    pub coding_pattern: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorProfile {
    pub id: i64,
    pub username: String,
    pub avatar_url: String,
    pub level: u32,
    pub total_score: i64,
    pub experience_points: i64,
    pub activity_streak: u32,
    pub preferred_work_hours: Option<String>,
    pub skill_tags: Vec<String>,
    pub burnout_risk_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorMetrics {
    pub total_commits: u64,
    pub total_issues_closed: u64,
    pub total_prs_reviewed: u64,
    pub recent_commits_30d: u64,
    pub repositories_count: u64,
    pub collaborations_count: u64,
}

/// Response of `/api/contributors/{id}/burnout/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnoutReport {
    pub risk_score: f64,
    /// "low", "medium" or "high".
    pub risk_level: String,
    pub recommendations: Vec<String>,
    /// Activity counts per week, oldest first.
    pub weekly_activity: Vec<u64>,
}

/// Response of `POST /api/contributors/{id}/badges/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeAward {
    pub success: bool,
    pub badges_awarded: Vec<String>,
    pub count: u32,
}

/// Lightweight author reference embedded in commit payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRef {
    pub id: Option<i64>,
    pub username: String,
    pub avatar_url: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryRef {
    pub id: Option<i64>,
    pub name: String,
    pub url: String,
}

/// A commit as returned by the analytics endpoints, with its AI summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsCommit {
    pub id: i64,
    pub url: String,
    pub summary: String,
    pub committed_at: Option<String>,
    pub additions: u64,
    pub deletions: u64,
    pub files_changed: u64,
    pub churn: f64,
    pub contributor: PersonRef,
    pub repository: RepositoryRef,
}

/// Response of `/api/commits/analytics/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitAnalytics {
    pub commits: Vec<AnalyticsCommit>,
    pub total: u64,
}

/// Response of `/api/commits/contributor-summaries/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorSummaries {
    pub success: bool,
    pub error: Option<String>,
    pub contributors: Vec<ContributorSummary>,
    pub total_contributors: u64,
    pub repository_id: Option<i64>,
}

impl ContributorSummaries {
    pub fn total_commits(&self) -> u64 {
        self.contributors.iter().map(|c| c.stats.total_commits).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorSummary {
    pub contributor: PersonRef,
    pub stats: SummaryStats,
    pub work_summary: String,
    pub recent_commits: Vec<AnalyticsCommit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryStats {
    pub total_commits: u64,
    pub total_additions: u64,
    pub total_deletions: u64,
    pub total_files_changed: u64,
    pub lines_changed: u64,
}
