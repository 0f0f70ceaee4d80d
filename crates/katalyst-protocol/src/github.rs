//! GitHub App installations, repository import and the hosted git browser.

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::serde_util::loose_string;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Installation {
    pub id: i64,
    pub account_login: String,
    pub account_type: String,
    pub account_avatar_url: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationsResponse {
    pub installations: Vec<Installation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallUrl {
    pub install_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationRepository {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "loose_string")]
    pub description: String,
    #[serde(deserialize_with = "loose_string")]
    pub language: String,
    pub private: bool,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub is_imported: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationRepositories {
    pub repositories: Vec<InstallationRepository>,
}

impl InstallationRepositories {
    /// Repositories that have not been imported yet.
    pub fn importable(&self) -> impl Iterator<Item = &InstallationRepository> {
        self.repositories.iter().filter(|r| !r.is_imported)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkImportRequest {
    pub repository_ids: Vec<i64>,
    pub auto_webhook: bool,
}

impl BulkImportRequest {
    pub fn new(repository_ids: Vec<i64>) -> Self {
        Self {
            repository_ids,
            auto_webhook: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkImportSummary {
    pub total: u64,
    pub success: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkImportResponse {
    pub summary: BulkImportSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub repo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportedRepository {
    pub id: Option<i64>,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportResponse {
    pub success: bool,
    pub error: Option<String>,
    pub message: Option<String>,
    pub repository: Option<ImportedRepository>,
}

impl Envelope for ImportResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportStatus {
    pub repositories: Vec<crate::entities::Repository>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
}

impl GitEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == "directory" || self.kind == "dir"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitCommit {
    pub sha: String,
    pub message: String,
    pub author: String,
    #[serde(deserialize_with = "loose_string")]
    pub timestamp: String,
}

impl GitCommit {
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitBrowse {
    pub repository: String,
    pub files: Vec<GitEntry>,
    pub recent_commits: Vec<GitCommit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitFileContent {
    pub path: String,
    pub content: String,
    pub size: u64,
}

/// One repository on the backend's git server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedRepository {
    pub name: String,
    pub owner: String,
    pub clone_url: String,
    pub branches: Vec<String>,
    pub last_commit: Option<GitCommit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedRepositories {
    pub username: String,
    pub repositories: Vec<HostedRepository>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedRepository {
    pub repository: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_import_request_enables_webhooks() {
        let body = serde_json::to_value(BulkImportRequest::new(vec![4, 9])).unwrap();
        assert_eq!(body["repository_ids"], serde_json::json!([4, 9]));
        assert_eq!(body["auto_webhook"], true);
    }

    #[test]
    fn test_import_request_omits_missing_token() {
        let body = serde_json::to_value(ImportRequest {
            repo_url: "octo/engine".into(),
            github_token: None,
        })
        .unwrap();
        assert!(body.get("github_token").is_none());
    }

    #[test]
    fn test_importable_filters_imported() {
        let repos: InstallationRepositories = serde_json::from_str(
            r#"{"repositories": [
                {"id": 1, "name": "a", "is_imported": true, "description": null},
                {"id": 2, "name": "b"}
            ]}"#,
        )
        .unwrap();
        let names: Vec<_> = repos.importable().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn test_hosted_repository_without_commits() {
        let list: HostedRepositories = serde_json::from_str(
            r#"{"username": "ada", "total": 1, "repositories": [
                {"name": "engine", "owner": "ada", "branches": ["main"], "last_commit": null}
            ]}"#,
        )
        .unwrap();
        assert_eq!(list.repositories[0].branches, vec!["main"]);
        assert!(list.repositories[0].last_commit.is_none());
    }

    #[test]
    fn test_git_commit_short_sha() {
        let commit = GitCommit {
            sha: "0123456789abcdef".into(),
            ..Default::default()
        };
        assert_eq!(commit.short_sha(), "0123456");
        let short = GitCommit {
            sha: "abc".into(),
            ..Default::default()
        };
        assert_eq!(short.short_sha(), "abc");
    }
}
