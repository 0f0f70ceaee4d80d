//! Typed REST client for the Katalyst backend.

use katalyst_protocol::endpoints;
use katalyst_protocol::*;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::{ClientError, Config};

/// Query string pairs for a GET request. Empty values are omitted.
pub type Query<'a> = &'a [(&'a str, String)];

#[derive(Debug, Clone)]
pub struct KatalystClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl KatalystClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        config.validate()?;
        let base = Url::parse(config.api_url.trim_end_matches('/'))
            .map_err(|e| ClientError::Config(format!("api_url: {e}")))?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::Config("api_token is not a valid header value".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        // Timeouts are per request so the event stream is not cut off.
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base,
            timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let raw = format!("{}{}", self.base.as_str().trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| ClientError::Config(format!("bad url {raw}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> Result<T, ClientError> {
        let url = self.url(path)?;
        let params: Vec<_> = query.iter().filter(|(_, v)| !v.is_empty()).collect();
        tracing::debug!(url = %url, "GET");
        let resp = self.http.get(url).query(&params).timeout(self.timeout).send().await?;
        decode(resp).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(path)?;
        tracing::debug!(url = %url, "POST");
        let resp = self.http.post(url).json(body).timeout(self.timeout).send().await?;
        decode(resp).await
    }

    // Dashboard

    pub async fn data(&self) -> Result<DataSnapshot, ClientError> {
        self.get(endpoints::DATA, &[]).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.get(endpoints::DASHBOARD_STATS, &[]).await
    }

    pub async fn activity_trends(&self, days: u32) -> Result<ActivityTrends, ClientError> {
        self.get(endpoints::DASHBOARD_TRENDS, &[("days", days.to_string())])
            .await
    }

    pub async fn team_health(&self) -> Result<TeamHealthReport, ClientError> {
        self.get(endpoints::TEAM_HEALTH, &[]).await
    }

    pub async fn leaderboard(&self) -> Result<LeaderboardResponse, ClientError> {
        self.get(endpoints::LEADERBOARD, &[]).await
    }

    // Contributors

    pub async fn contributor_stats(&self, id: i64) -> Result<ContributorStats, ClientError> {
        self.get(&endpoints::contributor_stats(id), &[]).await
    }

    pub async fn contributor_burnout(&self, id: i64) -> Result<BurnoutReport, ClientError> {
        self.get(&endpoints::contributor_burnout(id), &[]).await
    }

    pub async fn award_badges(&self, id: i64) -> Result<BadgeAward, ClientError> {
        self.post(&endpoints::contributor_badges(id), &serde_json::json!({}))
            .await
    }

    // Triage and chatbot

    pub async fn triage_issue(&self, request: &TriageRequest) -> Result<TriageResult, ClientError> {
        request.issue_data.validate()?;
        let resp: TriageResponse = self.post(endpoints::TRIAGE_ISSUE, request).await?;
        let resp = check_envelope(resp, "Triage failed")?;
        resp.triage_result
            .ok_or_else(|| ProtocolError::UnexpectedShape("missing triage_result".into()).into())
    }

    pub async fn classify_issue(&self, issue: &IssueDraft) -> Result<Classification, ClientError> {
        issue.validate()?;
        let resp: ClassifyResponse = self.post(endpoints::TRIAGE_CLASSIFY, issue).await?;
        let resp = check_envelope(resp, "Classification failed")?;
        resp.classification
            .ok_or_else(|| ProtocolError::UnexpectedShape("missing classification".into()).into())
    }

    /// Fetch one chatbot report as markdown.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, ClientError> {
        let topic = request.topic();
        let resp: ChatbotResponse = match request {
            ChatRequest::PrSummary(body) => self.post(endpoints::CHATBOT_PR_SUMMARY, body).await?,
            ChatRequest::TeamHealth { repository_id } => {
                let query = [("repository_id", repository_id.map(|id| id.to_string()).unwrap_or_default())];
                self.get(endpoints::CHATBOT_TEAM_HEALTH, &query).await?
            }
            ChatRequest::DailyDigest => self.get(endpoints::CHATBOT_DAILY_DIGEST, &[]).await?,
            ChatRequest::RiskAlerts => self.get(endpoints::CHATBOT_RISK_ALERTS, &[]).await?,
        };
        let resp = check_envelope(resp, topic.fallback_error())?;
        resp.document(topic)
            .ok_or_else(|| ClientError::Backend(topic.fallback_error().to_string()))
    }

    // Release readiness, collaboration and commits

    pub async fn release_dashboard(&self, repo_id: i64) -> Result<ReleaseDashboard, ClientError> {
        self.get(&endpoints::release_dashboard(repo_id), &[]).await
    }

    pub async fn collaboration_network(
        &self,
        repo_id: Option<i64>,
    ) -> Result<CollaborationGraph, ClientError> {
        let query = [("repo_id", repo_id.map(|id| id.to_string()).unwrap_or_default())];
        self.get(endpoints::COLLABORATION_NETWORK, &query).await
    }

    pub async fn commit_analytics(&self, query: Query<'_>) -> Result<CommitAnalytics, ClientError> {
        self.get(endpoints::COMMITS_ANALYTICS, query).await
    }

    pub async fn contributor_summaries(
        &self,
        repo_id: Option<i64>,
    ) -> Result<ContributorSummaries, ClientError> {
        let query = [("repo_id", repo_id.map(|id| id.to_string()).unwrap_or_default())];
        let resp: ContributorSummaries = self.get(endpoints::CONTRIBUTOR_SUMMARIES, &query).await?;
        check_envelope(resp, "Failed to load contributor summaries")
    }

    // Repository import

    pub async fn import_status(&self) -> Result<ImportStatus, ClientError> {
        self.get(endpoints::IMPORT_STATUS, &[]).await
    }

    pub async fn import_repository(
        &self,
        repo_url: &str,
        github_token: Option<&str>,
    ) -> Result<ImportResponse, ClientError> {
        let repo_url = crate::import::validate_repo_url(repo_url)?;
        let body = ImportRequest {
            repo_url: repo_url.to_string(),
            github_token: github_token.filter(|t| !t.is_empty()).map(str::to_string),
        };
        let resp: ImportResponse = self.post(endpoints::IMPORT_REPOSITORY, &body).await?;
        check_envelope(resp, "Import failed")
    }

    // GitHub App

    pub async fn installations(&self) -> Result<InstallationsResponse, ClientError> {
        self.get(endpoints::GITHUB_APP_INSTALLATIONS, &[]).await
    }

    pub async fn install_url(&self) -> Result<InstallUrl, ClientError> {
        self.get(endpoints::GITHUB_APP_INSTALL_URL, &[]).await
    }

    pub async fn installation_repositories(
        &self,
        installation_id: i64,
    ) -> Result<InstallationRepositories, ClientError> {
        self.get(&endpoints::installation_repositories(installation_id), &[])
            .await
    }

    pub async fn bulk_import(
        &self,
        installation_id: i64,
        repository_ids: Vec<i64>,
    ) -> Result<BulkImportSummary, ClientError> {
        if repository_ids.is_empty() {
            return Err(ClientError::InvalidInput("Select at least one repository".into()));
        }
        let body = BulkImportRequest::new(repository_ids);
        let resp: BulkImportResponse = self
            .post(&endpoints::installation_bulk_import(installation_id), &body)
            .await?;
        Ok(resp.summary)
    }

    // Hosted git

    pub async fn git_repositories(&self, owner: &str) -> Result<HostedRepositories, ClientError> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(ClientError::InvalidInput("Owner is required".into()));
        }
        self.get(&endpoints::git_repositories(owner), &[]).await
    }

    pub async fn git_browse(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<GitBrowse, ClientError> {
        let query = [("branch", branch.to_string()), ("path", path.to_string())];
        self.get(&endpoints::git_browse(owner, repo), &query).await
    }

    pub async fn git_file(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<GitFileContent, ClientError> {
        let query = [("branch", branch.to_string()), ("path", path.to_string())];
        self.get(&endpoints::git_file(owner, repo), &query).await
    }

    pub async fn git_create(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreatedRepository, ClientError> {
        if name.trim().is_empty() {
            return Err(ClientError::InvalidInput("Repository name is required".into()));
        }
        let body = CreateRepositoryRequest {
            name: name.trim().to_string(),
            description: description.to_string(),
        };
        self.post(endpoints::GIT_CREATE, &body).await
    }

    // Live stream

    /// Open the long-lived event stream. The caller owns the response body.
    pub async fn open_event_stream(&self) -> Result<reqwest::Response, ClientError> {
        let url = self.url(endpoints::EVENTS_STREAM)?;
        tracing::info!(url = %url, "opening live event stream");
        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(status_error(resp).await);
        }
        Ok(resp)
    }
}

/// Turn a `success: false` envelope into `ClientError::Backend`.
fn check_envelope<T: Envelope>(resp: T, fallback: &str) -> Result<T, ClientError> {
    if resp.succeeded() {
        Ok(resp)
    } else {
        let message = resp.error_message().unwrap_or(fallback).to_string();
        tracing::debug!(error = %message, "backend reported failure");
        Err(ClientError::Backend(message))
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    if !resp.status().is_success() {
        return Err(status_error(resp).await);
    }
    let body = resp.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Prefer the body's `error` field; fall back to the status reason.
async fn status_error(resp: reqwest::Response) -> ClientError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
    tracing::warn!(status = status.as_u16(), error = %message, "request failed");
    ClientError::Status {
        status: status.as_u16(),
        message,
    }
}
