/// Backend origin used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Number of live events retained by the activity feed.
pub const LIVE_FEED_CAPACITY: usize = 20;

/// Default window for the dashboard activity trends.
pub const DEFAULT_TREND_DAYS: u32 = 30;

/// Default page size for commit analytics.
pub const DEFAULT_COMMIT_LIMIT: u32 = 50;

/// Relative API paths. Identifiers are interpolated by the helpers below.
pub mod endpoints {
    pub const DATA: &str = "/api/get_data/";
    pub const DASHBOARD_STATS: &str = "/api/dashboard/stats/";
    pub const DASHBOARD_TRENDS: &str = "/api/dashboard/trends/";
    pub const TEAM_HEALTH: &str = "/api/team-health/";
    pub const LEADERBOARD: &str = "/api/leaderboard/";
    pub const TRIAGE_ISSUE: &str = "/api/triage/issue/";
    pub const TRIAGE_CLASSIFY: &str = "/api/triage/classify/";
    pub const CHATBOT_PR_SUMMARY: &str = "/api/chatbot/pr-summary/";
    pub const CHATBOT_TEAM_HEALTH: &str = "/api/chatbot/team-health/";
    pub const CHATBOT_DAILY_DIGEST: &str = "/api/chatbot/daily-digest/";
    pub const CHATBOT_RISK_ALERTS: &str = "/api/chatbot/risk-alerts/";
    pub const COLLABORATION_NETWORK: &str = "/api/collaboration/network/";
    pub const COMMITS_ANALYTICS: &str = "/api/commits/analytics/";
    pub const CONTRIBUTOR_SUMMARIES: &str = "/api/commits/contributor-summaries/";
    pub const IMPORT_STATUS: &str = "/api/repositories/import-status/";
    pub const IMPORT_REPOSITORY: &str = "/api/repositories/import/";
    pub const GITHUB_APP_INSTALLATIONS: &str = "/api/github-app/installations/";
    pub const GITHUB_APP_INSTALL_URL: &str = "/api/github-app/install-url/";
    pub const GIT_CREATE: &str = "/api/git/create/";
    pub const EVENTS_STREAM: &str = "/api/events/stream/";

    pub fn contributor_stats(id: i64) -> String {
        format!("/api/contributors/{id}/stats/")
    }

    pub fn contributor_burnout(id: i64) -> String {
        format!("/api/contributors/{id}/burnout/")
    }

    pub fn contributor_badges(id: i64) -> String {
        format!("/api/contributors/{id}/badges/")
    }

    pub fn release_dashboard(repo_id: i64) -> String {
        format!("/api/release-readiness/{repo_id}/dashboard/")
    }

    pub fn installation_repositories(installation_id: i64) -> String {
        format!("/api/github-app/installations/{installation_id}/repositories/")
    }

    pub fn installation_bulk_import(installation_id: i64) -> String {
        format!("/api/github-app/installations/{installation_id}/bulk-import/")
    }

    pub fn git_repositories(owner: &str) -> String {
        format!("/api/git/{owner}/repositories/")
    }

    pub fn git_browse(owner: &str, repo: &str) -> String {
        format!("/api/git/{owner}/{repo}/browse/")
    }

    pub fn git_file(owner: &str, repo: &str) -> String {
        format!("/api/git/{owner}/{repo}/file/")
    }
}

#[cfg(test)]
mod tests {
    use super::endpoints;

    #[test]
    fn test_parameterised_paths_keep_trailing_slash() {
        assert_eq!(endpoints::contributor_stats(7), "/api/contributors/7/stats/");
        assert_eq!(endpoints::release_dashboard(3), "/api/release-readiness/3/dashboard/");
        assert_eq!(endpoints::git_file("ada", "engine"), "/api/git/ada/engine/file/");
        assert_eq!(endpoints::git_repositories("ada"), "/api/git/ada/repositories/");
    }
}
