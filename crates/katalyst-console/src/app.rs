//! Console application state.
//!
//! The UI task owns `App`. Every fetch is spawned on the runtime and its
//! outcome comes back as an [`AppEvent`] over an unbounded channel, so
//! results land in whatever order the requests finish.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use katalyst_client::{
    BellNotifier, ClientError, Config, KatalystClient, LiveFeed, Notification, Notifier,
    TracingNotifier,
};
use katalyst_protocol::*;
use katalyst_views::{
    ChatPage, CommitFilters, ContributorPage, Form, InstallationsPage, Loadable, NetworkView, Page, ReadinessPage,
    SummariesPage, TeamHealthPage, TriageForm, TriageMode,
};
use ratatui::layout::Rect;
use ratatui::style::Color;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;

use crate::render;

const MAX_MESSAGES: usize = 500;

/// Completed background work, delivered to the UI task.
#[derive(Debug)]
pub enum AppEvent {
    Snapshot(Result<DataSnapshot, ClientError>),
    Stats(Result<(DashboardStats, ActivityTrends), ClientError>),
    Leaderboard(Result<LeaderboardResponse, ClientError>),
    ContributorStats(i64, Result<ContributorStats, ClientError>),
    Burnout(i64, Result<BurnoutReport, ClientError>),
    BadgeAward(i64, Result<BadgeAward, ClientError>),
    TeamHealth(Result<TeamHealthReport, ClientError>),
    Readiness(i64, Result<ReleaseDashboard, ClientError>),
    Network(Result<CollaborationGraph, ClientError>),
    Commits(Result<CommitAnalytics, ClientError>),
    Summaries(Result<ContributorSummaries, ClientError>),
    Triage(Result<TriageResult, ClientError>),
    Chat(ChatTopic, Result<String, ClientError>),
    Import(Result<ImportResponse, ClientError>),
    ImportStatus(Result<ImportStatus, ClientError>),
    Installations(Result<InstallationsResponse, ClientError>),
    InstallationRepos(i64, Result<InstallationRepositories, ClientError>),
    BulkImport(i64, Result<BulkImportSummary, ClientError>),
    Notice(Notification),
}

/// Forwards live notifications into the console output.
pub struct ConsoleNotifier {
    tx: UnboundedSender<AppEvent>,
    inner: Box<dyn Notifier>,
}

impl ConsoleNotifier {
    pub fn new(tx: UnboundedSender<AppEvent>, bell: bool) -> Self {
        let inner: Box<dyn Notifier> = if bell {
            Box::new(BellNotifier)
        } else {
            Box::new(TracingNotifier)
        };
        Self { tx, inner }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        self.inner.notify(notification);
        let _ = self.tx.send(AppEvent::Notice(notification.clone()));
    }
}

pub struct App {
    client: KatalystClient,
    pub config: Config,
    tx: UnboundedSender<AppEvent>,

    pub page: Page,
    pub overview: Loadable<DataSnapshot>,
    pub stats: Loadable<(DashboardStats, ActivityTrends)>,
    pub leaderboard: Loadable<LeaderboardResponse>,
    pub contributor: ContributorPage,
    pub team_health: TeamHealthPage,
    pub readiness: ReadinessPage,
    pub network: Loadable<NetworkView>,
    pub commits: Loadable<CommitAnalytics>,
    pub commit_filters: CommitFilters,
    pub summaries: SummariesPage,
    pub triage_form: Form,
    pub triage_mode: TriageMode,
    pub triage: Loadable<TriageResult>,
    pub chat: ChatPage,
    pub import_status: Loadable<ImportStatus>,
    pub import_result: Loadable<ImportResponse>,
    pub installations: Loadable<InstallationsResponse>,
    pub install_page: InstallationsPage,
    pub feed: Arc<RwLock<LiveFeed>>,
    /// Repository filter shared by network, commits and summaries.
    pub repo_filter: Option<i64>,

    /// Current text in the input field.
    pub input: String,
    /// Cursor position within the input field, in chars.
    pub cursor_pos: usize,
    history: Vec<String>,
    history_pos: Option<usize>,
    pub console_messages: Vec<(DateTime<Utc>, String, Color)>,

    /// Last known terminal area, for canvas sizing and mouse mapping.
    pub screen: Rect,
    requests_started: u64,
}

impl App {
    pub fn new(config: Config, client: KatalystClient, tx: UnboundedSender<AppEvent>) -> Self {
        let commit_filters = CommitFilters {
            limit: config.commit_limit,
            ..Default::default()
        };
        let mut app = Self {
            client,
            config,
            tx,
            page: Page::Overview,
            overview: Loadable::Idle,
            stats: Loadable::Idle,
            leaderboard: Loadable::Idle,
            contributor: ContributorPage::default(),
            team_health: TeamHealthPage::default(),
            readiness: ReadinessPage::default(),
            network: Loadable::Idle,
            commits: Loadable::Idle,
            commit_filters,
            summaries: SummariesPage::default(),
            triage_form: TriageForm::form(),
            triage_mode: TriageMode::Triage,
            triage: Loadable::Idle,
            chat: ChatPage::default(),
            import_status: Loadable::Idle,
            import_result: Loadable::Idle,
            installations: Loadable::Idle,
            install_page: InstallationsPage::default(),
            feed: Arc::new(RwLock::new(LiveFeed::new())),
            repo_filter: None,
            input: String::new(),
            cursor_pos: 0,
            history: Vec::new(),
            history_pos: None,
            console_messages: Vec::new(),
            screen: Rect::new(0, 0, 120, 40),
            requests_started: 0,
        };
        let api = app.client.base_url().to_string();
        app.add_message(&format!("Katalyst console connected to {api}"), Color::Cyan);
        app.add_message(
            "Tab/Shift+Tab switch pages, r refreshes, /help lists commands, /quit exits",
            Color::DarkGray,
        );
        app
    }

    pub fn client(&self) -> &KatalystClient {
        &self.client
    }

    /// Number of fetches spawned so far.
    pub fn requests_started(&self) -> u64 {
        self.requests_started
    }

    pub fn add_message(&mut self, msg: &str, color: Color) {
        self.console_messages.push((Utc::now(), msg.to_string(), color));
        if self.console_messages.len() > MAX_MESSAGES {
            self.console_messages.remove(0);
        }
    }

    fn spawn<T, Fut, W>(&mut self, fut: Fut, wrap: W)
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
        W: FnOnce(Result<T, ClientError>) -> AppEvent + Send + 'static,
    {
        self.requests_started += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fut.await;
            if tx.send(wrap(result)).is_err() {
                tracing::debug!("console closed before fetch completed");
            }
        });
    }

    // ── Navigation ─────────────────────────────────────────────

    pub fn goto(&mut self, page: Page) {
        self.page = page;
        if self.page_is_idle() {
            self.refresh();
        }
    }

    fn page_is_idle(&self) -> bool {
        match self.page {
            Page::Overview => self.overview.is_idle(),
            Page::Leaderboard => self.leaderboard.is_idle(),
            Page::Contributor => {
                self.contributor.stats.is_idle() && self.contributor.contributor_id.is_some()
            }
            Page::TeamHealth => self.team_health.report.is_idle(),
            Page::Readiness => self.readiness.dashboard.is_idle() && self.readiness.repo_id.is_some(),
            Page::Network => self.network.is_idle(),
            Page::Commits => self.commits.is_idle(),
            Page::Summaries => self.summaries.data.is_idle(),
            Page::Import => self.import_status.is_idle(),
            Page::Installations => self.installations.is_idle(),
            Page::Triage | Page::Chat | Page::Live => false,
        }
    }

    /// Re-fetch the current page. Shown data stays visible until replaced.
    pub fn refresh(&mut self) {
        let client = self.client.clone();
        match self.page {
            Page::Overview => {
                self.overview.start();
                let c = client.clone();
                self.spawn(async move { c.data().await }, AppEvent::Snapshot);
                self.stats.start();
                let days = self.config.trend_days;
                self.spawn(
                    async move {
                        tokio::try_join!(client.dashboard_stats(), client.activity_trends(days))
                    },
                    AppEvent::Stats,
                );
            }
            Page::Leaderboard => {
                self.leaderboard.start();
                self.spawn(async move { client.leaderboard().await }, AppEvent::Leaderboard);
            }
            Page::Contributor => match self.contributor.contributor_id {
                Some(id) => {
                    self.contributor.stats.start();
                    self.contributor.burnout.start();
                    let c = client.clone();
                    self.spawn(async move { c.contributor_stats(id).await }, move |r| {
                        AppEvent::ContributorStats(id, r)
                    });
                    self.spawn(async move { client.contributor_burnout(id).await }, move |r| {
                        AppEvent::Burnout(id, r)
                    });
                }
                None => self.add_message("Pick a contributor first: /who <id>", Color::Yellow),
            },
            Page::TeamHealth => {
                self.team_health.report.start();
                self.spawn(async move { client.team_health().await }, AppEvent::TeamHealth);
            }
            Page::Readiness => match self.readiness.repo_id {
                Some(id) => {
                    self.readiness.dashboard.start();
                    self.spawn(async move { client.release_dashboard(id).await }, move |r| {
                        AppEvent::Readiness(id, r)
                    });
                }
                None => self.add_message("Pick a repository first: /repo <id>", Color::Yellow),
            },
            Page::Network => {
                self.network.start();
                let repo = self.repo_filter;
                self.spawn(
                    async move { client.collaboration_network(repo).await },
                    AppEvent::Network,
                );
            }
            Page::Commits => {
                self.commits.start();
                let query = self.commit_filters.query();
                self.spawn(
                    async move { client.commit_analytics(&query).await },
                    AppEvent::Commits,
                );
            }
            Page::Summaries => {
                self.summaries.data.start();
                let repo = self.repo_filter;
                self.spawn(
                    async move { client.contributor_summaries(repo).await },
                    AppEvent::Summaries,
                );
            }
            Page::Chat => self.ask_chat(),
            Page::Import => {
                self.import_status.start();
                self.spawn(async move { client.import_status().await }, AppEvent::ImportStatus);
            }
            Page::Installations => {
                self.installations.start();
                let c = client.clone();
                self.spawn(async move { c.installations().await }, AppEvent::Installations);
                if let Some(id) = self.install_page.installation_id {
                    self.load_installation(id);
                }
            }
            Page::Triage | Page::Live => {}
        }
    }

    // ── Events ─────────────────────────────────────────────────

    /// Apply one finished fetch to the page it belongs to.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Snapshot(r) => {
                self.report_error("overview", &r);
                self.overview.finish(r);
            }
            AppEvent::Stats(r) => {
                self.report_error("dashboard stats", &r);
                self.stats.finish(r);
            }
            AppEvent::Leaderboard(r) => {
                self.report_error("leaderboard", &r);
                self.leaderboard.finish(r);
            }
            AppEvent::ContributorStats(id, r) => {
                if self.contributor.contributor_id != Some(id) {
                    return;
                }
                self.report_error("contributor stats", &r);
                self.contributor.stats.finish(r);
            }
            AppEvent::Burnout(id, r) => {
                if self.contributor.contributor_id != Some(id) {
                    return;
                }
                self.report_error("burnout report", &r);
                self.contributor.burnout.finish(r);
            }
            AppEvent::BadgeAward(id, r) => {
                self.contributor.awarding = false;
                match r {
                    Ok(award) => {
                        self.add_message(&format!("Awarded {} new badge(s)", award.count), Color::Green);
                        if self.contributor.contributor_id == Some(id) && self.page == Page::Contributor {
                            self.refresh();
                        }
                    }
                    Err(e) => self.add_message(&format!("Badge award failed: {e}"), Color::Red),
                }
            }
            AppEvent::TeamHealth(r) => {
                self.report_error("team health", &r);
                self.team_health.report.finish(r);
                self.team_health.move_cursor(0);
            }
            AppEvent::Readiness(id, r) => {
                if self.readiness.repo_id != Some(id) {
                    tracing::debug!(repo_id = id, "ignoring readiness for a previous repository");
                    return;
                }
                self.report_error("release readiness", &r);
                self.readiness.dashboard.finish(r);
            }
            AppEvent::Network(r) => {
                self.report_error("collaboration network", &r);
                let (w, h) = render::canvas_size(render::network_canvas(self.screen));
                let selected = self.network.data().and_then(|v| v.selected());
                self.network.finish(r.map(|graph| NetworkView::new(graph, w, h)));
                if let (Some(view), Some(id)) = (self.network.data_mut(), selected) {
                    view.select(id);
                }
            }
            AppEvent::Commits(r) => {
                self.report_error("commit analytics", &r);
                self.commits.finish(r);
            }
            AppEvent::Summaries(r) => {
                self.report_error("contributor summaries", &r);
                match r {
                    Ok(summaries) => self.summaries.loaded(summaries),
                    Err(e) => self.summaries.data.finish::<ClientError>(Err(e)),
                }
            }
            AppEvent::Triage(r) => {
                match &r {
                    Ok(_) => self.add_message("Triage complete", Color::Green),
                    Err(e) => self.add_message(&format!("Triage failed: {e}"), Color::Red),
                }
                self.triage.finish(r);
            }
            AppEvent::Chat(topic, r) => {
                if topic != self.chat.topic {
                    return;
                }
                self.report_error(topic.title(), &r);
                self.chat.document.finish(r);
            }
            AppEvent::Import(r) => {
                match &r {
                    Ok(resp) => {
                        let name = resp.repository.as_ref().map(|r| r.name.clone()).unwrap_or_default();
                        self.add_message(&format!("Imported repository {name}"), Color::Green);
                    }
                    Err(e) => self.add_message(&format!("Import failed: {e}"), Color::Red),
                }
                let ok = r.is_ok();
                self.import_result.finish(r);
                if ok && self.page == Page::Import {
                    self.refresh();
                }
            }
            AppEvent::ImportStatus(r) => {
                self.report_error("import status", &r);
                self.import_status.finish(r);
            }
            AppEvent::Installations(r) => {
                self.report_error("installations", &r);
                if let Ok(resp) = &r {
                    if self.install_page.installation_id.is_none() {
                        if let Some(first) = resp.installations.first() {
                            self.load_installation(first.id);
                        }
                    }
                }
                self.installations.finish(r);
            }
            AppEvent::InstallationRepos(id, r) => {
                if self.install_page.installation_id != Some(id) {
                    return;
                }
                self.report_error("installation repositories", &r);
                self.install_page.repositories.finish(r);
                self.install_page.move_cursor(0);
            }
            AppEvent::BulkImport(id, r) => {
                match &r {
                    Ok(s) => self.add_message(
                        &format!("Imported {} of {} repositories ({} failed)", s.success, s.total, s.failed),
                        Color::Green,
                    ),
                    Err(e) => self.add_message(&format!("Bulk import failed: {e}"), Color::Red),
                }
                if r.is_ok() {
                    self.install_page.picked.clear();
                    self.load_installation(id);
                }
            }
            AppEvent::Notice(n) => {
                self.add_message(&format!("{}: {}", n.title, n.body), Color::LightYellow);
            }
        }
    }

    fn report_error<T>(&mut self, what: &str, result: &Result<T, ClientError>) {
        if let Err(e) = result {
            tracing::warn!(page = what, error = %e, "fetch failed");
            self.add_message(&format!("Failed to load {what}: {e}"), Color::Red);
        }
    }

    // ── Page actions ───────────────────────────────────────────

    fn submit_triage(&mut self) {
        let client = self.client.clone();
        match self.triage_mode {
            TriageMode::Triage => match TriageForm::triage_request(&self.triage_form) {
                Ok(request) => {
                    self.triage.start();
                    self.spawn(async move { client.triage_issue(&request).await }, AppEvent::Triage);
                }
                Err(e) => self.triage.finish::<ProtocolError>(Err(e)),
            },
            TriageMode::Classify => match TriageForm::classify_request(&self.triage_form) {
                Ok(draft) => {
                    self.triage.start();
                    self.spawn(
                        async move {
                            client
                                .classify_issue(&draft)
                                .await
                                .map(TriageResult::from_classification)
                        },
                        AppEvent::Triage,
                    );
                }
                Err(e) => self.triage.finish::<ProtocolError>(Err(e)),
            },
        }
    }

    fn ask_chat(&mut self) {
        match self.chat.request() {
            Ok(request) => {
                let topic = self.chat.topic;
                let client = self.client.clone();
                self.chat.document.start();
                self.spawn(async move { client.chat(&request).await }, move |r| {
                    AppEvent::Chat(topic, r)
                });
            }
            Err(e) => self.chat.document.finish::<ProtocolError>(Err(e)),
        }
    }

    fn import(&mut self, url: &str) {
        let url = url.to_string();
        let client = self.client.clone();
        self.import_result.start();
        self.spawn(
            async move { client.import_repository(&url, None).await },
            AppEvent::Import,
        );
    }

    /// Open the contributor page for `id`, fetching fresh data.
    fn show_contributor(&mut self, id: i64) {
        self.contributor.select(id);
        self.page = Page::Contributor;
        self.refresh();
    }

    fn award_badges(&mut self) {
        let Some(id) = self.contributor.contributor_id else {
            self.add_message("Pick a contributor first: /who <id>", Color::Yellow);
            return;
        };
        if self.contributor.awarding {
            self.add_message("Badge check already running", Color::Yellow);
            return;
        }
        self.contributor.awarding = true;
        let client = self.client.clone();
        self.spawn(async move { client.award_badges(id).await }, move |r| {
            AppEvent::BadgeAward(id, r)
        });
    }

    fn load_installation(&mut self, id: i64) {
        if self.install_page.installation_id != Some(id) {
            self.install_page.picked.clear();
            self.install_page.cursor = 0;
        }
        self.install_page.installation_id = Some(id);
        self.install_page.repositories.start();
        let client = self.client.clone();
        self.spawn(
            async move { client.installation_repositories(id).await },
            move |r| AppEvent::InstallationRepos(id, r),
        );
    }

    fn bulk_import(&mut self) {
        let Some(id) = self.install_page.installation_id else {
            self.add_message("Select an installation first: /install <id>", Color::Yellow);
            return;
        };
        let ids = self.install_page.picked_ids();
        if ids.is_empty() {
            self.add_message("Select at least one repository (Enter or /all)", Color::Yellow);
            return;
        }
        let client = self.client.clone();
        self.spawn(
            async move { client.bulk_import(id, ids).await },
            move |r| AppEvent::BulkImport(id, r),
        );
    }

    /// Enter with an empty input line.
    fn activate(&mut self) {
        match self.page {
            Page::TeamHealth => {
                if self.team_health.detail.is_some() {
                    self.team_health.close_detail();
                } else {
                    self.team_health.open_detail();
                }
            }
            Page::Summaries => self.summaries.toggle_at_cursor(),
            Page::Contributor => self.award_badges(),
            Page::Installations => self.install_page.toggle_pick(),
            Page::Network => {
                if let Some(view) = self.network.data_mut() {
                    view.select_next();
                }
            }
            Page::Triage => self.submit_triage(),
            Page::Chat => self.ask_chat(),
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.page {
            Page::TeamHealth => self.team_health.move_cursor(delta),
            Page::Summaries => self.summaries.move_cursor(delta),
            Page::Installations => self.install_page.move_cursor(delta),
            Page::Network => {
                if let Some(view) = self.network.data_mut() {
                    if delta >= 0 {
                        view.select_next();
                    } else {
                        view.select_prev();
                    }
                }
            }
            Page::Triage => self.triage_form.focus_next(),
            Page::Chat => self.chat.form.focus_next(),
            _ => {}
        }
    }

    // ── Input ──────────────────────────────────────────────────

    fn process_input(&mut self) -> bool {
        let input = self.input.trim().to_string();
        self.input.clear();
        self.cursor_pos = 0;
        if input.is_empty() {
            return false;
        }
        self.history.push(input.clone());
        self.history_pos = None;

        if input.starts_with('/') {
            return self.process_command(&input);
        }
        match self.page {
            Page::Triage => {
                if let Some(field) = self.triage_form.focused_mut() {
                    field.value = input;
                }
                self.triage_form.focus_next();
            }
            Page::Chat => {
                if let Some(field) = self.chat.form.focused_mut() {
                    field.value = input;
                }
                self.chat.form.focus_next();
            }
            Page::Import => self.import(&input),
            _ => self.add_message("Unknown input. Type /help for commands.", Color::Yellow),
        }
        false
    }

    /// Process a slash command. Returns `true` to quit.
    fn process_command(&mut self, cmd: &str) -> bool {
        let (command, args) = match cmd.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (cmd, ""),
        };

        match command {
            "/quit" | "/exit" | "/q" => return true,
            "/help" => {
                for line in HELP {
                    self.add_message(line, Color::White);
                }
            }
            "/page" => match parse_page(args) {
                Some(page) => self.goto(page),
                None => self.add_message(&format!("Unknown page: {args}"), Color::Red),
            },
            "/refresh" => self.refresh(),
            "/view" => self.team_health.toggle_view(),
            "/tab" => self.readiness.tab = self.readiness.tab.next(),
            "/repo" => match parse_filter(args) {
                Ok(repo) => {
                    self.repo_filter = repo;
                    self.commit_filters.repo_id = repo;
                    if repo.is_some() && self.readiness.repo_id != repo {
                        self.readiness.repo_id = repo;
                        self.readiness.dashboard = Loadable::Idle;
                    }
                    self.refresh();
                }
                Err(msg) => self.add_message(&msg, Color::Red),
            },
            "/contributor" => match parse_filter(args) {
                Ok(id) => {
                    self.commit_filters.contributor_id = id;
                    if self.page == Page::Commits {
                        self.refresh();
                    }
                }
                Err(msg) => self.add_message(&msg, Color::Red),
            },
            "/who" => match args.parse::<i64>() {
                Ok(id) => self.show_contributor(id),
                Err(_) => self.add_message("Usage: /who <contributor id>", Color::Red),
            },
            "/badges" => self.award_badges(),
            "/limit" => match args.parse::<u32>() {
                Ok(limit) if limit > 0 => {
                    self.commit_filters.limit = limit;
                    if self.page == Page::Commits {
                        self.refresh();
                    }
                }
                _ => self.add_message("Usage: /limit <n>", Color::Red),
            },
            "/triage" => {
                self.triage_mode = TriageMode::Triage;
                self.submit_triage();
            }
            "/classify" => {
                self.triage_mode = TriageMode::Classify;
                self.submit_triage();
            }
            "/clear" => {
                self.triage_form = TriageForm::form();
                self.triage = Loadable::Idle;
            }
            "/topic" => {
                self.chat.next_topic();
                self.chat.document = Loadable::Idle;
            }
            "/ask" => self.ask_chat(),
            "/import" => {
                if args.is_empty() {
                    self.add_message("Usage: /import <github url or owner/repo>", Color::Red);
                } else {
                    self.import(args);
                }
            }
            "/install" => match args.parse::<i64>() {
                Ok(id) => self.load_installation(id),
                Err(_) => self.add_message("Usage: /install <installation id>", Color::Red),
            },
            "/all" => self.install_page.pick_all(),
            "/bulk" => self.bulk_import(),
            other => self.add_message(&format!("Unknown command: {other}. Type /help."), Color::Red),
        }
        false
    }

    /// Handle keyboard input. Returns `true` if the console should exit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let typing = !self.input.is_empty() || self.page.has_form();
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Tab, _) => self.goto(self.page.next()),
            (KeyCode::BackTab, _) => self.goto(self.page.prev()),
            (KeyCode::F(5), _) => self.refresh(),
            (KeyCode::Esc, _) => {
                if !self.input.is_empty() {
                    self.input.clear();
                    self.cursor_pos = 0;
                } else {
                    self.team_health.close_detail();
                    if let Some(view) = self.network.data_mut() {
                        view.clear_selection();
                    }
                }
            }
            (KeyCode::Char(c), _) if !typing && c != '/' => match c {
                'r' => self.refresh(),
                'v' => self.team_health.toggle_view(),
                't' => self.readiness.tab = self.readiness.tab.next(),
                'q' => return true,
                _ => {}
            },
            (KeyCode::Char(c), _) => {
                let at = byte_index(&self.input, self.cursor_pos);
                self.input.insert(at, c);
                self.cursor_pos += 1;
            }
            (KeyCode::Backspace, _) => {
                if self.cursor_pos > 0 {
                    let at = byte_index(&self.input, self.cursor_pos - 1);
                    self.input.remove(at);
                    self.cursor_pos -= 1;
                }
            }
            (KeyCode::Left, _) if !self.input.is_empty() => {
                self.cursor_pos = self.cursor_pos.saturating_sub(1);
            }
            (KeyCode::Right, _) if !self.input.is_empty() => {
                if self.cursor_pos < self.input.chars().count() {
                    self.cursor_pos += 1;
                }
            }
            (KeyCode::Left, _) => self.move_cursor(-1),
            (KeyCode::Right, _) => self.move_cursor(1),
            (KeyCode::Up, _) if !self.input.is_empty() || (self.page.has_form() && !self.history.is_empty()) => {
                if !self.history.is_empty() {
                    let pos = match self.history_pos {
                        Some(p) if p > 0 => p - 1,
                        Some(p) => p,
                        None => self.history.len() - 1,
                    };
                    self.history_pos = Some(pos);
                    self.input = self.history[pos].clone();
                    self.cursor_pos = self.input.chars().count();
                }
            }
            (KeyCode::Down, _) if self.history_pos.is_some() => {
                if let Some(pos) = self.history_pos {
                    if pos + 1 < self.history.len() {
                        self.history_pos = Some(pos + 1);
                        self.input = self.history[pos + 1].clone();
                        self.cursor_pos = self.input.chars().count();
                    } else {
                        self.history_pos = None;
                        self.input.clear();
                        self.cursor_pos = 0;
                    }
                }
            }
            (KeyCode::Up, _) => self.move_cursor(-1),
            (KeyCode::Down, _) => self.move_cursor(1),
            (KeyCode::Enter, _) => {
                if self.input.trim().is_empty() {
                    self.input.clear();
                    self.cursor_pos = 0;
                    self.activate();
                } else {
                    return self.process_input();
                }
            }
            _ => {}
        }
        false
    }

    /// Left clicks on the network canvas select the node underneath.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.page != Page::Network || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let canvas = render::network_canvas(self.screen);
        let Some((x, y)) = render::cell_to_canvas(canvas, mouse.column, mouse.row) else {
            return;
        };
        if let Some(view) = self.network.data_mut() {
            match view.click(x, y) {
                Some(id) => tracing::debug!(node = id, "network node selected"),
                None => tracing::trace!(x, y, "network click missed"),
            }
        }
    }

    /// Track the terminal size; the network layout follows the canvas.
    pub fn on_resize(&mut self, area: Rect) {
        self.screen = area;
        let (w, h) = render::canvas_size(render::network_canvas(area));
        if let Some(view) = self.network.data_mut() {
            view.resize(w, h);
        }
    }
}

const HELP: [&str; 15] = [
    "Keys: Tab/Shift+Tab pages, r refresh, Up/Down move, Enter select, Esc close, q quit",
    "  /page <name|n>      Jump to a page",
    "  /refresh            Re-fetch the current page (F5)",
    "  /view               Team health: toggle overview/heatmap (v)",
    "  /tab                Release readiness: next tab (t)",
    "  /repo <id|all>      Repository for readiness, network, commits, summaries",
    "  /who <id>, /badges  Contributor stats; award earned badges (Enter)",
    "  /contributor <id|all>, /limit <n>   Commit filters",
    "  Triage page: type a value + Enter to fill the focused field",
    "  /triage, /classify, /clear          Submit or reset the triage form",
    "  /topic, /ask        Chat: switch topic, fetch the report",
    "  /import <url>       Import a GitHub repository",
    "  /install <id>, /all, /bulk          GitHub App bulk import",
    "  Network: click a node or use arrows to select",
    "  /quit               Exit",
];

fn parse_page(args: &str) -> Option<Page> {
    if let Ok(n) = args.parse::<usize>() {
        return Page::ALL.get(n.checked_sub(1)?).copied();
    }
    let wanted = args.to_ascii_lowercase().replace(['-', '_'], " ");
    Page::ALL
        .iter()
        .find(|p| {
            let title = p.title().to_ascii_lowercase();
            title == wanted || title.starts_with(&wanted) && !wanted.is_empty()
        })
        .copied()
}

fn parse_filter(args: &str) -> Result<Option<i64>, String> {
    match args {
        "" | "all" => Ok(None),
        id => id
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("Expected a numeric id or 'all', got '{id}'")),
    }
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices().nth(char_pos).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (App, tokio::sync::mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let config = Config::default();
        let client = KatalystClient::new(&config).unwrap();
        (App::new(config, client, tx), rx)
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page("team health"), Some(Page::TeamHealth));
        assert_eq!(parse_page("team-health"), Some(Page::TeamHealth));
        assert_eq!(parse_page("lead"), Some(Page::Leaderboard));
        assert_eq!(parse_page("2"), Some(Page::Leaderboard));
        assert_eq!(parse_page("0"), None);
        assert_eq!(parse_page("nowhere"), None);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("all"), Ok(None));
        assert_eq!(parse_filter("7"), Ok(Some(7)));
        assert!(parse_filter("x").is_err());
    }

    #[test]
    fn test_heatmap_toggle_does_not_fetch() {
        let (mut app, _rx) = app();
        app.page = Page::TeamHealth;
        app.team_health.report.finish::<ClientError>(Ok(TeamHealthReport::default()));
        let before = app.requests_started();
        app.handle_key(KeyCode::Char('v'), KeyModifiers::NONE);
        assert_eq!(app.team_health.view, katalyst_views::TeamHealthView::Heatmap);
        assert_eq!(app.requests_started(), before);
    }

    #[test]
    fn test_triage_form_filled_from_input_line() {
        let (mut app, _rx) = app();
        app.page = Page::Triage;
        for c in "42".chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.triage_form.value(TriageForm::REPOSITORY_ID), "42");
        assert_eq!(app.triage_form.focus, TriageForm::TITLE);
    }

    #[test]
    fn test_invalid_triage_fails_locally() {
        let (mut app, _rx) = app();
        app.page = Page::Triage;
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.requests_started(), 0);
        assert_eq!(app.triage.error(), Some("invalid input: Please provide both title and repository ID"));
    }

    #[test]
    fn test_quit_command() {
        let (mut app, _rx) = app();
        app.page = Page::Triage;
        for c in "/quit".chars() {
            app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        assert!(app.handle_key(KeyCode::Enter, KeyModifiers::NONE));
    }

    #[test]
    fn test_stale_readiness_result_ignored() {
        let (mut app, _rx) = app();
        app.readiness.repo_id = Some(2);
        app.apply(AppEvent::Readiness(1, Ok(ReleaseDashboard::default())));
        assert!(app.readiness.dashboard.is_idle());
    }

    #[test]
    fn test_stale_contributor_result_ignored() {
        let (mut app, _rx) = app();
        app.contributor.select(5);
        app.apply(AppEvent::ContributorStats(4, Ok(ContributorStats::default())));
        app.apply(AppEvent::Burnout(4, Ok(BurnoutReport::default())));
        assert!(app.contributor.stats.is_idle() && app.contributor.burnout.is_idle());
        app.apply(AppEvent::Burnout(5, Ok(BurnoutReport::default())));
        assert!(app.contributor.burnout.data().is_some());
    }

    #[tokio::test]
    async fn test_who_opens_contributor_and_fetches_both_reports() {
        let (mut app, _rx) = app();
        assert!(!app.process_command("/who 7"));
        assert_eq!(app.page, Page::Contributor);
        assert_eq!(app.contributor.contributor_id, Some(7));
        assert!(app.contributor.stats.is_loading() && app.contributor.burnout.is_loading());
        assert_eq!(app.requests_started(), 2);
    }

    #[tokio::test]
    async fn test_badge_award_runs_once_at_a_time() {
        let (mut app, _rx) = app();
        app.contributor.select(7);
        app.page = Page::Contributor;
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.requests_started(), 1);
        app.apply(AppEvent::BadgeAward(7, Err(ClientError::InvalidInput("offline".into()))));
        assert!(!app.contributor.awarding);
        let (_, last, _) = app.console_messages.last().unwrap();
        assert_eq!(last, "Badge award failed: offline");
    }

    #[test]
    fn test_notice_lands_in_console_output() {
        let (mut app, _rx) = app();
        app.apply(AppEvent::Notice(Notification {
            title: "New Commits Pushed".into(),
            body: "ada pushed 1 commit to engine".into(),
        }));
        let (_, last, _) = app.console_messages.last().unwrap();
        assert_eq!(last, "New Commits Pushed: ada pushed 1 commit to engine");
    }
}
