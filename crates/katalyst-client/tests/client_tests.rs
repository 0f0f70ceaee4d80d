use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::Query;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use katalyst_client::{
    spawn_live_feed, ClientError, Config, FeedStatus, KatalystClient, LiveFeed, Notification, Notifier,
};
use katalyst_protocol::{ChatRequest, IssueDraft, TriageRequest};
use serde_json::json;
use tokio::sync::RwLock;

const SSE_BODY: &str = concat!(
    "data: {\"type\": \"connected\", \"message\": \"hello\", \"timestamp\": 1700000000}\n\n",
    ": comment\n\n",
    "data: {\"type\": \"heartbeat\", \"timestamp\": 1700000001}\r\n\r\n",
    "data: {\"type\": \"push\", \"data\": {\"author\": \"ada\", \"commits\": 2, \"repository\": \"engine\"}, \"timestamp\": 1700000002}\n\n",
    "data: not json\n\n",
    "data: {\"type\": \"pull_request\", \"data\": {\"author\": \"lin\", \"action\": \"opened\", \"number\": 9, \"title\": \"Cache\"}, \"timestamp\": 1700000003}\n\n",
);

async fn events_stream() -> Response {
    // Deliberately awkward chunk boundaries.
    let chunks: Vec<Result<Bytes, std::convert::Infallible>> = SSE_BODY
        .as_bytes()
        .chunks(7)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(futures_util::stream::iter(chunks)))
        .unwrap()
}

async fn leaderboard() -> Json<serde_json::Value> {
    Json(json!({"leaderboard": [
        {"id": 3, "username": "zoe", "total_score": 900, "level": 11},
        {"id": 1, "username": "ada", "total_score": 1200, "level": 12},
        {"id": 2, "username": "lin", "total_score": 50, "level": 1}
    ]}))
}

async fn get_data(headers: HeaderMap) -> Response {
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer s3cret") => Json(json!({"repositories": [{"id": 1, "name": "engine"}]})).into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"error": "Authentication required"}))).into_response(),
    }
}

async fn commits(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    let mut keys: Vec<_> = params.keys().cloned().collect();
    keys.sort();
    Json(json!({"commits": [], "total": params.len(), "keys": keys}))
}

async fn triage() -> Json<serde_json::Value> {
    Json(json!({"success": false, "error": "AI service unavailable"}))
}

async fn digest() -> Json<serde_json::Value> {
    Json(json!({"success": true, "digest": "# Daily digest"}))
}

async fn network_missing() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn git_browse(
    axum::extract::Path((owner, repo)): axum::extract::Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    Json(json!({
        "repository": format!("{owner}/{repo}"),
        "files": [{"name": "src", "path": "src", "type": "directory", "size": 0}],
        "recent_commits": [{"sha": "0123456789abcdef", "message": "Init", "author": "ada", "timestamp": 1700000000}],
        "branch": params.get("branch").cloned().unwrap_or_default()
    }))
}

async fn git_repositories(
    axum::extract::Path(owner): axum::extract::Path<String>,
) -> Json<serde_json::Value> {
    Json(json!({
        "username": owner,
        "total": 2,
        "repositories": [
            {"name": "engine", "owner": owner, "clone_url": "http://localhost:8000/git/ada/engine.git",
             "branches": ["main", "dev"],
             "last_commit": {"sha": "fedcba9876543210", "message": "Fix build", "author": "ada", "timestamp": 1700000000}},
            {"name": "empty", "owner": owner, "branches": [], "last_commit": null}
        ]
    }))
}

async fn installation_repos() -> Json<serde_json::Value> {
    Json(json!({"repositories": [
        {"id": 10, "name": "engine", "description": null, "language": "Rust", "is_imported": true},
        {"id": 11, "name": "site", "description": "Docs", "language": null}
    ]}))
}

async fn bulk_import(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
    let ids = body["repository_ids"].as_array().map_or(0, Vec::len);
    Json(json!({"summary": {"total": ids, "success": ids, "failed": 0}}))
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/get_data/", get(get_data))
        .route("/api/leaderboard/", get(leaderboard))
        .route("/api/commits/analytics/", get(commits))
        .route("/api/triage/issue/", post(triage))
        .route("/api/chatbot/daily-digest/", get(digest))
        .route("/api/collaboration/network/", get(network_missing))
        .route("/api/git/:owner/repositories/", get(git_repositories))
        .route("/api/git/:owner/:repo/browse/", get(git_browse))
        .route("/api/github-app/installations/:id/repositories/", get(installation_repos))
        .route("/api/github-app/installations/:id/bulk-import/", post(bulk_import))
        .route("/api/events/stream/", get(events_stream));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(url: &str) -> KatalystClient {
    let config = Config {
        api_url: url.to_string(),
        ..Default::default()
    };
    KatalystClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_leaderboard_keeps_server_order() {
    let url = spawn_backend().await;
    let board = client_for(&url).leaderboard().await.unwrap();
    let names: Vec<_> = board.leaderboard.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(names, vec!["zoe", "ada", "lin"]);
}

#[tokio::test]
async fn test_status_error_uses_body_message() {
    let url = spawn_backend().await;
    let err = client_for(&url).data().await.unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Authentication required");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_status_error_without_json_body() {
    let url = spawn_backend().await;
    let err = client_for(&url).collaboration_network(None).await.unwrap_err();
    assert_eq!(err.to_string(), "server returned 500: Internal Server Error");
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let url = spawn_backend().await;
    let config = Config {
        api_url: url,
        api_token: Some("s3cret".into()),
        ..Default::default()
    };
    let snapshot = KatalystClient::new(&config).unwrap().data().await.unwrap();
    assert_eq!(snapshot.repositories[0].name, "engine");
}

#[tokio::test]
async fn test_empty_query_params_are_omitted() {
    let url = spawn_backend().await;
    let query = [
        ("repo_id", String::new()),
        ("contributor_id", "4".to_string()),
        ("limit", "50".to_string()),
    ];
    let analytics = client_for(&url).commit_analytics(&query).await.unwrap();
    assert_eq!(analytics.total, 2);
}

#[tokio::test]
async fn test_failed_envelope_surfaces_backend_error() {
    let url = spawn_backend().await;
    let request = TriageRequest {
        repository_id: 1,
        issue_data: IssueDraft {
            title: "Crash on save".into(),
            ..Default::default()
        },
    };
    let err = client_for(&url).triage_issue(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::Backend(ref m) if m == "AI service unavailable"));
}

#[tokio::test]
async fn test_chat_returns_markdown_document() {
    let url = spawn_backend().await;
    let doc = client_for(&url).chat(&ChatRequest::DailyDigest).await.unwrap();
    assert_eq!(doc, "# Daily digest");
}

#[tokio::test]
async fn test_local_validation_makes_no_request() {
    // Nothing listens on this origin; validation must fail first.
    let client = client_for("http://127.0.0.1:9");
    let err = client.import_repository("not a url", None).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));

    let err = client.classify_issue(&IssueDraft::default()).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));
}

#[tokio::test]
async fn test_git_browse_passes_owner_repo_and_branch() {
    let url = spawn_backend().await;
    let listing = client_for(&url).git_browse("ada", "engine", "main", "").await.unwrap();
    assert_eq!(listing.repository, "ada/engine");
    assert!(listing.files[0].is_directory());
    assert_eq!(listing.recent_commits[0].short_sha(), "0123456");
    assert_eq!(listing.recent_commits[0].timestamp, "1700000000");
}

#[tokio::test]
async fn test_git_repositories_lists_owner_repositories() {
    let url = spawn_backend().await;
    let list = client_for(&url).git_repositories("ada").await.unwrap();
    assert_eq!(list.username, "ada");
    assert_eq!(list.total, 2);
    let names: Vec<_> = list.repositories.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["engine", "empty"]);
    let last = list.repositories[0].last_commit.as_ref().unwrap();
    assert_eq!(last.short_sha(), "fedcba9");
    assert!(list.repositories[1].last_commit.is_none());

    let err = client_for(&url).git_repositories(" ").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));
}

#[tokio::test]
async fn test_bulk_import_only_importable_repositories() {
    let url = spawn_backend().await;
    let client = client_for(&url);
    let repos = client.installation_repositories(5).await.unwrap();
    let ids: Vec<i64> = repos.importable().map(|r| r.id).collect();
    assert_eq!(ids, vec![11]);

    let summary = client.bulk_import(5, ids).await.unwrap();
    assert_eq!((summary.total, summary.success, summary.failed), (1, 1, 0));

    let err = client.bulk_import(5, Vec::new()).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));
}

#[tokio::test]
async fn test_git_create_requires_a_name() {
    let err = client_for("http://127.0.0.1:9").git_create("  ", "").await.unwrap_err();
    assert_eq!(err.to_string(), "Repository name is required");
}

async fn wait_for_disconnect(feed: &Arc<RwLock<LiveFeed>>) -> FeedStatus {
    for _ in 0..100 {
        let status = feed.read().await.status().clone();
        if matches!(status, FeedStatus::Disconnected(_)) {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("live feed never disconnected");
}

#[tokio::test]
async fn test_live_feed_consumes_chunked_stream() {
    let url = spawn_backend().await;
    let feed = Arc::new(RwLock::new(LiveFeed::new()));
    let _handle = spawn_live_feed(client_for(&url), feed.clone(), None);

    assert_eq!(wait_for_disconnect(&feed).await, FeedStatus::Disconnected(None));
    let feed = feed.read().await;
    let messages: Vec<_> = feed.entries().map(|e| e.message()).collect();
    assert_eq!(
        messages,
        vec!["lin opened PR #9: Cache", "ada pushed 2 commits to engine"]
    );
}

#[tokio::test]
async fn test_live_feed_reports_connection_failure() {
    let feed = Arc::new(RwLock::new(LiveFeed::new()));
    let _handle = spawn_live_feed(client_for("http://127.0.0.1:9"), feed.clone(), None);
    assert!(matches!(
        wait_for_disconnect(&feed).await,
        FeedStatus::Disconnected(Some(_))
    ));
}

#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.seen.lock().unwrap().push(notification.clone());
    }
}

#[tokio::test]
async fn test_live_feed_notifies_only_repository_activity() {
    let url = spawn_backend().await;
    let feed = Arc::new(RwLock::new(LiveFeed::new()));
    let notifier = Arc::new(RecordingNotifier::default());
    let sink: Arc<dyn Notifier> = notifier.clone();
    let _handle = spawn_live_feed(client_for(&url), feed.clone(), Some(sink));

    wait_for_disconnect(&feed).await;
    let seen = notifier.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            Notification {
                title: "New Commits Pushed".into(),
                body: "ada pushed 2 commits to engine".into(),
            },
            Notification {
                title: "Pull Request Activity".into(),
                body: "lin opened PR #9: Cache".into(),
            },
        ]
    );
}
