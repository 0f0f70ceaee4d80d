use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use katalyst_client::{ClientError, Config, KatalystClient, LiveFeed};
use katalyst_console::{render, App, AppEvent};
use katalyst_protocol::*;
use katalyst_views::{Page, TeamHealthView};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use serde_json::json;
use tokio::sync::mpsc::{self, UnboundedReceiver};

fn app_for(url: &str) -> (App, UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let config = Config {
        api_url: url.to_string(),
        ..Default::default()
    };
    let client = KatalystClient::new(&config).unwrap();
    (App::new(config, client, tx), rx)
}

fn offline_app() -> App {
    app_for("http://127.0.0.1:9").0
}

fn screen(app: &App, feed: &LiveFeed) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.draw(|frame| render::draw(frame, app, feed)).unwrap();
    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn leaderboard(names: &[&str]) -> LeaderboardResponse {
    LeaderboardResponse {
        leaderboard: names
            .iter()
            .enumerate()
            .map(|(i, name)| LeaderboardEntry {
                id: i as i64 + 1,
                username: name.to_string(),
                level: 3,
                ..Default::default()
            })
            .collect(),
    }
}

fn graph() -> CollaborationGraph {
    let node = |id, name: &str, score| NetworkNode {
        id,
        name: name.to_string(),
        score,
        level: 4,
        ..Default::default()
    };
    CollaborationGraph {
        nodes: vec![node(1, "ada", 9000), node(2, "lin", 300), node(3, "zoe", 5200)],
        edges: vec![
            NetworkEdge {
                source: 1,
                target: 2,
                strength: 0.8,
                interactions: 12,
            },
            NetworkEdge {
                source: 1,
                target: 3,
                strength: 0.2,
                interactions: 3,
            },
        ],
    }
}

#[test]
fn test_leaderboard_rendered_in_server_order() {
    let mut app = offline_app();
    app.page = Page::Leaderboard;
    app.apply(AppEvent::Leaderboard(Ok(leaderboard(&["zoe", "ada", "lin"]))));

    let text = screen(&app, &LiveFeed::new());
    let zoe = text.find("zoe").unwrap();
    let ada = text.find("ada").unwrap();
    let lin = text.find("lin").unwrap();
    assert!(zoe < ada && ada < lin);
}

#[test]
fn test_failed_refresh_keeps_rows_under_error_banner() {
    let mut app = offline_app();
    app.page = Page::Leaderboard;
    app.apply(AppEvent::Leaderboard(Ok(leaderboard(&["zoe"]))));
    app.leaderboard.start();
    app.apply(AppEvent::Leaderboard(Err(ClientError::Status {
        status: 500,
        message: "database offline".into(),
    })));

    let text = screen(&app, &LiveFeed::new());
    assert!(text.contains("server returned 500: database offline"));
    assert!(text.contains("showing last loaded data"));
    assert!(text.contains("zoe"));
}

#[test]
fn test_contributor_page_shows_profile_burnout_and_badges() {
    let mut app = offline_app();
    app.page = Page::Contributor;
    app.contributor.select(7);

    let mut stats = ContributorStats::default();
    stats.contributor.username = "ada".into();
    stats.contributor.level = 2;
    stats.contributor.experience_points = 2450;
    stats.metrics.total_commits = 120;
    stats.badges.push(Badge {
        badge_type: "bug_hunter".into(),
        ..Default::default()
    });
    app.apply(AppEvent::ContributorStats(7, Ok(stats)));
    app.apply(AppEvent::Burnout(
        7,
        Ok(BurnoutReport {
            risk_score: 0.72,
            risk_level: "high".into(),
            recommendations: vec!["Take a break".into()],
            weekly_activity: vec![3, 9, 14, 2],
        }),
    ));

    let text = screen(&app, &LiveFeed::new());
    assert!(text.contains("Contributor #7"));
    assert!(text.contains("Level 2"));
    assert!(text.contains("XP 2,450 / 3,000"));
    assert!(text.contains("Risk Level: HIGH  72%"));
    assert!(text.contains("Take a break"));
    assert!(text.contains("Bug Hunter"));
    assert!(text.contains("Weekly Activity"));
}

#[test]
fn test_contributor_page_asks_for_an_id() {
    let mut app = offline_app();
    app.page = Page::Contributor;
    let text = screen(&app, &LiveFeed::new());
    assert!(text.contains("Pick a contributor with /who <id>."));
}

#[test]
fn test_clicking_a_node_shows_its_details() {
    let mut app = offline_app();
    app.on_resize(Rect::new(0, 0, 120, 40));
    app.page = Page::Network;
    app.apply(AppEvent::Network(Ok(graph())));

    let target = app.network.data().unwrap().layout().nodes[2].clone();
    let canvas = render::network_canvas(app.screen);
    app.handle_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column: canvas.x + (target.x / 4.0) as u16,
        row: canvas.y + (target.y / 8.0) as u16,
        modifiers: KeyModifiers::NONE,
    });
    assert_eq!(app.network.data().unwrap().selected(), Some(target.id));

    let text = screen(&app, &LiveFeed::new());
    assert!(text.contains("Collaborations 1"));
    assert!(text.contains("Score 5,200"));
}

#[test]
fn test_network_selection_survives_resize_and_refresh() {
    let mut app = offline_app();
    app.page = Page::Network;
    app.apply(AppEvent::Network(Ok(graph())));
    app.handle_key(KeyCode::Right, KeyModifiers::NONE);
    let selected = app.network.data().unwrap().selected();
    assert!(selected.is_some());

    app.on_resize(Rect::new(0, 0, 90, 30));
    app.apply(AppEvent::Network(Ok(graph())));
    assert_eq!(app.network.data().unwrap().selected(), selected);
}

#[test]
fn test_live_page_lists_newest_first() {
    let mut app = offline_app();
    app.page = Page::Live;
    let mut feed = LiveFeed::new();
    for raw in [
        r#"{"type": "push", "data": {"author": "ada", "commits": 2, "repository": "engine"}}"#,
        r#"{"type": "issues", "data": {"action": "opened", "issue_number": 4, "repository": "engine"}}"#,
    ] {
        feed.ingest(LiveEvent::from_json(raw).unwrap(), Utc::now());
    }

    let text = screen(&app, &feed);
    let issue = text.find("Issue #4 opened in engine").unwrap();
    let push = text.find("ada pushed 2 commits to engine").unwrap();
    assert!(issue < push);
    assert!(text.contains("Live Activity: Live"));
}

#[test]
fn test_triage_validation_message_is_shown() {
    let mut app = offline_app();
    app.page = Page::Triage;
    app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
    assert_eq!(app.requests_started(), 0);

    let text = screen(&app, &LiveFeed::new());
    assert!(text.contains("Please provide both title and repository ID"));
}

// ── Against a mock backend ─────────────────────────────────────

async fn spawn_backend(team_health_hits: Arc<AtomicUsize>) -> String {
    let app = Router::new()
        .route(
            "/api/leaderboard/",
            get(|| async { Json(json!({"leaderboard": [{"id": 7, "username": "ada", "level": 12}]})) }),
        )
        .route(
            "/api/team-health/",
            get(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Json(json!({
                    "team_health": [{"id": 1, "username": "ada", "overall_health": {"score": "71.5", "status": "yellow", "health_grade": "C"}}],
                    "overall_stats": {"total_members": 1, "warning_count": 1}
                }))
            }),
        )
        .with_state(team_health_hits);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn next_event(rx: &mut UnboundedReceiver<AppEvent>) -> AppEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("fetch timed out")
        .expect("channel closed")
}

#[tokio::test]
async fn test_page_command_fetches_and_applies() {
    let url = spawn_backend(Arc::new(AtomicUsize::new(0))).await;
    let (mut app, mut rx) = app_for(&url);
    app.page = Page::Triage;
    for c in "/page leaderboard".chars() {
        app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
    }
    app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
    assert_eq!(app.page, Page::Leaderboard);
    assert!(app.leaderboard.is_loading());

    let event = next_event(&mut rx).await;
    app.apply(event);
    let board = app.leaderboard.data().unwrap();
    assert_eq!(board.leaderboard[0].username, "ada");
}

#[tokio::test]
async fn test_heatmap_toggle_reuses_loaded_report() {
    let hits = Arc::new(AtomicUsize::new(0));
    let url = spawn_backend(hits.clone()).await;
    let (mut app, mut rx) = app_for(&url);
    app.goto(Page::TeamHealth);
    let event = next_event(&mut rx).await;
    app.apply(event);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    app.handle_key(KeyCode::Char('v'), KeyModifiers::NONE);
    app.handle_key(KeyCode::Char('v'), KeyModifiers::NONE);
    app.handle_key(KeyCode::Char('v'), KeyModifiers::NONE);
    assert_eq!(app.team_health.view, TeamHealthView::Heatmap);

    let text = screen(&app, &LiveFeed::new());
    assert!(text.contains("Heatmap"));
    assert!(text.contains("ada"));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
