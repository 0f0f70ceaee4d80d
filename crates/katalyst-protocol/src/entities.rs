//! Core backend entities: repositories, contributors and their work.

use serde::{Deserialize, Serialize};

/// A tracked repository, including its DORA metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub full_name: Option<String>,
    pub avatar_url: String,
    pub url: String,
    pub summary: String,
    pub is_private: bool,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub health_score: f64,
    /// "up", "down" or "stable".
    pub activity_trend: String,
    pub primary_language: Option<String>,
    pub velocity_score: f64,
    /// Deploys per day.
    pub deployment_frequency: f64,
    /// Hours.
    pub lead_time_for_changes: f64,
    /// Hours.
    pub mean_time_to_recovery: f64,
    /// Percentage.
    pub change_failure_rate: f64,
    pub contributor_count: u64,
    /// Commits in the last 30 days.
    pub recent_activity: u64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// A repository contributor with the gamification counters the backend keeps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contributor {
    pub id: i64,
    pub username: String,
    pub url: String,
    pub avatar_url: String,
    pub summary: String,
    pub total_commits: u64,
    pub total_issues_closed: u64,
    pub total_prs_reviewed: u64,
    pub total_score: i64,
    pub level: u32,
    pub experience_points: i64,
    pub preferred_work_hours: Option<String>,
    pub activity_streak: u32,
    pub last_activity: Option<String>,
    pub skill_tags: Vec<String>,
    /// 0..=1 scale.
    pub burnout_risk_score: f64,
    pub collaboration_score: f64,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub works: Vec<RepositoryWork>,
    pub badges: Vec<Badge>,
    pub badge_count: u32,
    pub next_level_xp: i64,
}

/// Work of one contributor in one repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryWork {
    pub id: i64,
    pub repository: Option<i64>,
    pub summary: String,
    pub commit_count: u64,
    pub issue_count: u64,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub commits: Vec<Commit>,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    pub id: i64,
    pub url: String,
    pub summary: String,
    pub additions: u64,
    pub deletions: u64,
    pub files_changed: u64,
    pub committed_at: Option<String>,
    pub code_churn_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: i64,
    pub url: String,
    pub summary: String,
    /// "open" or "closed".
    pub state: String,
    pub is_bug: bool,
    pub is_feature: bool,
    /// "low", "medium", "high" or "critical".
    pub priority: String,
    pub created_at: Option<String>,
}

/// An achievement awarded to a contributor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Badge {
    pub id: i64,
    pub badge_type: String,
    pub earned_date: Option<String>,
    pub description: Option<String>,
}

impl Badge {
    /// `first_commit` becomes `First Commit`.
    pub fn display_name(&self) -> String {
        self.badge_type
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Response of `/api/get_data/`: every repository and contributor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSnapshot {
    pub repositories: Vec<Repository>,
    pub contributors: Vec<Contributor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_tolerates_missing_fields() {
        let snap: DataSnapshot = serde_json::from_str(
            r#"{"repositories": [{"id": 1, "name": "engine"}], "contributors": [{"id": 2, "username": "ada", "works": [{"commits": [{"id": 9}]}]}]}"#,
        )
        .unwrap();
        assert_eq!(snap.repositories[0].name, "engine");
        assert_eq!(snap.repositories[0].stars, 0);
        assert_eq!(snap.contributors[0].works[0].commits.len(), 1);
        assert!(snap.contributors[0].works[0].issues.is_empty());
    }

    #[test]
    fn test_badge_display_name() {
        let badge = Badge { badge_type: "bug_hunter".into(), ..Default::default() };
        assert_eq!(badge.display_name(), "Bug Hunter");
    }
}
