//! Per-page view state. Each page owns its fetched data as a [`Loadable`]
//! plus whatever local selection or form input it needs.

use std::collections::{BTreeSet, HashSet};

use katalyst_protocol::{
    BurnoutReport, ChatRequest, ChatTopic, ContributorStats, ContributorSummaries,
    InstallationRepositories, IssueDraft, MemberHealth, PrSummaryRequest, ProtocolError,
    ReleaseDashboard, TeamHealthReport, TriageRequest, DEFAULT_COMMIT_LIMIT,
};

use crate::bands::BurnoutLevel;
use crate::format::title_case_key;
use crate::loadable::Loadable;

/// Console pages, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Overview,
    Leaderboard,
    Contributor,
    TeamHealth,
    Readiness,
    Network,
    Commits,
    Summaries,
    Triage,
    Chat,
    Live,
    Import,
    Installations,
}

impl Page {
    pub const ALL: [Page; 13] = [
        Page::Overview,
        Page::Leaderboard,
        Page::Contributor,
        Page::TeamHealth,
        Page::Readiness,
        Page::Network,
        Page::Commits,
        Page::Summaries,
        Page::Triage,
        Page::Chat,
        Page::Live,
        Page::Import,
        Page::Installations,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Leaderboard => "Leaderboard",
            Self::Contributor => "Contributor",
            Self::TeamHealth => "Team Health",
            Self::Readiness => "Release Readiness",
            Self::Network => "Network",
            Self::Commits => "Commits",
            Self::Summaries => "Summaries",
            Self::Triage => "Triage",
            Self::Chat => "Chat",
            Self::Live => "Live",
            Self::Import => "Import",
            Self::Installations => "GitHub App",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|p| p == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Pages with a text form capture printable keys.
    pub fn has_form(&self) -> bool {
        matches!(self, Self::Triage | Self::Chat | Self::Import)
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

// ── Team health ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeamHealthView {
    #[default]
    Overview,
    Heatmap,
}

impl TeamHealthView {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Overview => Self::Heatmap,
            Self::Heatmap => Self::Overview,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamHealthPage {
    pub report: Loadable<TeamHealthReport>,
    pub view: TeamHealthView,
    pub cursor: usize,
    /// Index of the member whose detail panel is open.
    pub detail: Option<usize>,
}

impl TeamHealthPage {
    /// Switch presentation. The loaded report is reused as is.
    pub fn toggle_view(&mut self) {
        self.view = self.view.toggled();
    }

    fn member_count(&self) -> usize {
        self.report.data().map_or(0, |r| r.team_health.len())
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.cursor = step_index(self.cursor, delta, self.member_count());
    }

    pub fn open_detail(&mut self) {
        if self.cursor < self.member_count() {
            self.detail = Some(self.cursor);
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail_member(&self) -> Option<&MemberHealth> {
        self.report.data()?.team_health.get(self.detail?)
    }
}

// ── Contributor ────────────────────────────────────────────────

/// XP needed per level.
const LEVEL_XP: i64 = 1000;

#[derive(Debug, Clone, Default)]
pub struct ContributorPage {
    pub contributor_id: Option<i64>,
    pub stats: Loadable<ContributorStats>,
    pub burnout: Loadable<BurnoutReport>,
    /// A badge award request is in flight.
    pub awarding: bool,
}

impl ContributorPage {
    /// Switch contributor. Data loaded for another one is dropped.
    pub fn select(&mut self, id: i64) {
        if self.contributor_id != Some(id) {
            self.contributor_id = Some(id);
            self.stats = Loadable::Idle;
            self.burnout = Loadable::Idle;
        }
    }

    pub fn burnout_level(&self) -> Option<BurnoutLevel> {
        self.burnout.data().map(|b| BurnoutLevel::parse(&b.risk_level))
    }

    /// `(xp, xp for the next level, percent of the current level done)`.
    pub fn xp_progress(&self) -> Option<(i64, i64, f64)> {
        let c = &self.stats.data()?.contributor;
        let next = (i64::from(c.level) + 1) * LEVEL_XP;
        let done = c.experience_points.rem_euclid(LEVEL_XP) as f64 * 100.0 / LEVEL_XP as f64;
        Some((c.experience_points, next, done))
    }
}

// ── Release readiness ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadinessTab {
    #[default]
    Overview,
    Trend,
    Details,
}

impl ReadinessTab {
    pub const ALL: [ReadinessTab; 3] = [Self::Overview, Self::Trend, Self::Details];

    pub fn next(&self) -> Self {
        match self {
            Self::Overview => Self::Trend,
            Self::Trend => Self::Details,
            Self::Details => Self::Overview,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Trend => "Trend",
            Self::Details => "Details",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadinessPage {
    pub repo_id: Option<i64>,
    pub dashboard: Loadable<ReleaseDashboard>,
    pub tab: ReadinessTab,
}

impl ReadinessPage {
    /// `(Title Case key, rendered value)` pairs of the detailed metrics.
    pub fn metric_rows(&self) -> Vec<(String, String)> {
        let Some(dashboard) = self.dashboard.data() else {
            return Vec::new();
        };
        dashboard
            .current
            .detailed_metrics
            .iter()
            .map(|(key, value)| {
                let shown = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (title_case_key(key), shown)
            })
            .collect()
    }
}

// ── Contributor summaries ──────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SummariesPage {
    pub data: Loadable<ContributorSummaries>,
    pub expanded: HashSet<i64>,
    pub cursor: usize,
}

impl SummariesPage {
    /// Install fresh data; the first contributor starts expanded.
    pub fn loaded(&mut self, summaries: ContributorSummaries) {
        self.expanded.clear();
        if let Some(id) = summaries.contributors.first().and_then(|c| c.contributor.id) {
            self.expanded.insert(id);
        }
        self.cursor = 0;
        self.data.finish::<String>(Ok(summaries));
    }

    pub fn toggle(&mut self, contributor_id: i64) {
        if !self.expanded.remove(&contributor_id) {
            self.expanded.insert(contributor_id);
        }
    }

    pub fn toggle_at_cursor(&mut self) {
        let id = self
            .data
            .data()
            .and_then(|d| d.contributors.get(self.cursor))
            .and_then(|c| c.contributor.id);
        if let Some(id) = id {
            self.toggle(id);
        }
    }

    pub fn is_expanded(&self, contributor_id: Option<i64>) -> bool {
        contributor_id.is_some_and(|id| self.expanded.contains(&id))
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.data.data().map_or(0, |d| d.contributors.len());
        self.cursor = step_index(self.cursor, delta, len);
    }
}

// ── Commit analytics ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFilters {
    pub repo_id: Option<i64>,
    pub contributor_id: Option<i64>,
    pub limit: u32,
}

impl Default for CommitFilters {
    fn default() -> Self {
        Self {
            repo_id: None,
            contributor_id: None,
            limit: DEFAULT_COMMIT_LIMIT,
        }
    }
}

impl CommitFilters {
    /// Query parameters; unset filters are left out.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::with_capacity(3);
        if let Some(id) = self.repo_id {
            out.push(("repo_id", id.to_string()));
        }
        if let Some(id) = self.contributor_id {
            out.push(("contributor_id", id.to_string()));
        }
        out.push(("limit", self.limit.to_string()));
        out
    }
}

// ── Forms ──────────────────────────────────────────────────────

/// A single-line text input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
        }
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }
}

/// Fields with a focus cursor, shared by every form page.
#[derive(Debug, Clone, Default)]
pub struct Form {
    pub fields: Vec<TextField>,
    pub focus: usize,
}

impl Form {
    pub fn new(labels: &[&'static str]) -> Self {
        Self {
            fields: labels.iter().copied().map(TextField::new).collect(),
            focus: 0,
        }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focused_mut(&mut self) -> Option<&mut TextField> {
        self.fields.get_mut(self.focus)
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.trimmed())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriageMode {
    /// Full triage: classification, duplicates and assignee.
    Triage,
    /// Classification only.
    Classify,
}

pub struct TriageForm;

impl TriageForm {
    pub const REPOSITORY_ID: usize = 0;
    pub const TITLE: usize = 1;
    pub const BODY: usize = 2;
    pub const LABELS: usize = 3;

    pub fn form() -> Form {
        Form::new(&["Repository ID", "Title", "Description", "Labels (comma separated)"])
    }

    fn draft(form: &Form) -> IssueDraft {
        IssueDraft {
            title: form.value(Self::TITLE).to_string(),
            body: form.value(Self::BODY).to_string(),
            labels: form
                .value(Self::LABELS)
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Full triage needs a title and a numeric repository id.
    pub fn triage_request(form: &Form) -> Result<TriageRequest, ProtocolError> {
        let draft = Self::draft(form);
        let repository_id = form.value(Self::REPOSITORY_ID).parse::<i64>().ok();
        match repository_id {
            Some(repository_id) if !draft.title.is_empty() => Ok(TriageRequest {
                repository_id,
                issue_data: draft,
            }),
            _ => Err(ProtocolError::InvalidInput(
                "Please provide both title and repository ID".into(),
            )),
        }
    }

    /// Classification needs only a title.
    pub fn classify_request(form: &Form) -> Result<IssueDraft, ProtocolError> {
        let draft = Self::draft(form);
        if draft.title.is_empty() {
            return Err(ProtocolError::InvalidInput("Please provide an issue title".into()));
        }
        Ok(draft)
    }
}

/// Chat page: topic picker plus the PR-summary inputs.
#[derive(Debug, Clone)]
pub struct ChatPage {
    pub topic: ChatTopic,
    pub form: Form,
    pub document: Loadable<String>,
}

impl Default for ChatPage {
    fn default() -> Self {
        Self {
            topic: ChatTopic::DailyDigest,
            form: Form::new(&["PR number", "Repository name"]),
            document: Loadable::Idle,
        }
    }
}

impl ChatPage {
    pub fn next_topic(&mut self) {
        let i = ChatTopic::ALL.iter().position(|t| *t == self.topic).unwrap_or(0);
        self.topic = ChatTopic::ALL[(i + 1) % ChatTopic::ALL.len()];
    }

    pub fn request(&self) -> Result<ChatRequest, ProtocolError> {
        match self.topic {
            ChatTopic::PrSummary => {
                let pr_number = self.form.value(0).parse::<u64>().map_err(|_| {
                    ProtocolError::InvalidInput("PR number must be a positive integer".into())
                })?;
                let repository_name = self.form.value(1);
                if repository_name.is_empty() {
                    return Err(ProtocolError::InvalidInput("Repository name is required".into()));
                }
                Ok(ChatRequest::PrSummary(PrSummaryRequest {
                    pr_number,
                    repository_name: repository_name.to_string(),
                }))
            }
            ChatTopic::TeamHealth => Ok(ChatRequest::TeamHealth {
                repository_id: None,
            }),
            ChatTopic::DailyDigest => Ok(ChatRequest::DailyDigest),
            ChatTopic::RiskAlerts => Ok(ChatRequest::RiskAlerts),
        }
    }
}

// ── GitHub App installations ───────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct InstallationsPage {
    pub installation_id: Option<i64>,
    pub repositories: Loadable<InstallationRepositories>,
    pub cursor: usize,
    /// Repository ids picked for bulk import.
    pub picked: BTreeSet<i64>,
}

impl InstallationsPage {
    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.repositories.data().map_or(0, |r| r.repositories.len());
        self.cursor = step_index(self.cursor, delta, len);
    }

    /// Toggle the repository under the cursor. Imported ones cannot be picked.
    pub fn toggle_pick(&mut self) {
        let Some(repo) = self
            .repositories
            .data()
            .and_then(|r| r.repositories.get(self.cursor))
        else {
            return;
        };
        if repo.is_imported {
            return;
        }
        let id = repo.id;
        if !self.picked.remove(&id) {
            self.picked.insert(id);
        }
    }

    /// Pick every repository not yet imported.
    pub fn pick_all(&mut self) {
        if let Some(repos) = self.repositories.data() {
            self.picked = repos.importable().map(|r| r.id).collect();
        }
    }

    pub fn picked_ids(&self) -> Vec<i64> {
        self.picked.iter().copied().collect()
    }
}

/// Move `current` by `delta` within `0..len`, clamping at the ends.
pub fn step_index(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use katalyst_protocol::{ContributorSummary, PersonRef};

    fn filled(values: &[&str]) -> Form {
        let mut form = TriageForm::form();
        for (field, value) in form.fields.iter_mut().zip(values) {
            field.value = value.to_string();
        }
        form
    }

    #[test]
    fn test_page_cycle() {
        assert_eq!(Page::Overview.next(), Page::Leaderboard);
        assert_eq!(Page::Leaderboard.next(), Page::Contributor);
        assert_eq!(Page::Overview.prev(), Page::Installations);
        assert_eq!(Page::Installations.next(), Page::Overview);
    }

    #[test]
    fn test_heatmap_toggle_keeps_report() {
        let mut page = TeamHealthPage::default();
        page.report.finish::<String>(Ok(TeamHealthReport::default()));
        page.toggle_view();
        assert_eq!(page.view, TeamHealthView::Heatmap);
        assert!(matches!(page.report, Loadable::Loaded(_)));
        page.toggle_view();
        assert_eq!(page.view, TeamHealthView::Overview);
    }

    #[test]
    fn test_contributor_switch_drops_old_data() {
        let mut page = ContributorPage::default();
        page.select(3);
        let mut stats = ContributorStats::default();
        stats.contributor.level = 2;
        stats.contributor.experience_points = 2450;
        page.stats.finish::<String>(Ok(stats));
        page.burnout.finish::<String>(Ok(BurnoutReport {
            risk_level: "Medium".into(),
            ..Default::default()
        }));
        assert_eq!(page.xp_progress(), Some((2450, 3000, 45.0)));
        assert_eq!(page.burnout_level(), Some(BurnoutLevel::Medium));

        page.select(3);
        assert!(page.stats.data().is_some());
        page.select(4);
        assert!(page.stats.is_idle() && page.burnout.is_idle());
        assert_eq!(page.burnout_level(), None);
    }

    #[test]
    fn test_commit_filters_omit_unset() {
        let filters = CommitFilters::default();
        assert_eq!(filters.query(), vec![("limit", "50".to_string())]);
        let filters = CommitFilters {
            repo_id: Some(2),
            ..Default::default()
        };
        assert_eq!(
            filters.query(),
            vec![("repo_id", "2".to_string()), ("limit", "50".to_string())]
        );
    }

    #[test]
    fn test_triage_validation() {
        assert!(TriageForm::triage_request(&filled(&["", "Crash"])).is_err());
        assert!(TriageForm::triage_request(&filled(&["abc", "Crash"])).is_err());
        assert!(TriageForm::triage_request(&filled(&["4", ""])).is_err());

        let req = TriageForm::triage_request(&filled(&["4", "Crash", "", "bug, ui ,"])).unwrap();
        assert_eq!(req.repository_id, 4);
        assert_eq!(req.issue_data.labels, vec!["bug", "ui"]);

        assert!(TriageForm::classify_request(&filled(&["", "Crash"])).is_ok());
        assert!(TriageForm::classify_request(&filled(&["4", " "])).is_err());
    }

    #[test]
    fn test_first_summary_expanded_by_default() {
        let mut page = SummariesPage::default();
        let person = |id| ContributorSummary {
            contributor: PersonRef {
                id: Some(id),
                ..Default::default()
            },
            ..Default::default()
        };
        page.loaded(ContributorSummaries {
            success: true,
            contributors: vec![person(7), person(8)],
            ..Default::default()
        });
        assert!(page.is_expanded(Some(7)));
        assert!(!page.is_expanded(Some(8)));
        page.toggle(7);
        page.move_cursor(1);
        page.toggle_at_cursor();
        assert!(!page.is_expanded(Some(7)));
        assert!(page.is_expanded(Some(8)));
    }

    #[test]
    fn test_chat_request_validation() {
        let mut page = ChatPage::default();
        assert_eq!(page.request().unwrap(), ChatRequest::DailyDigest);
        page.topic = ChatTopic::PrSummary;
        assert!(page.request().is_err());
        page.form.fields[0].value = "12".into();
        page.form.fields[1].value = "engine".into();
        assert!(matches!(page.request().unwrap(), ChatRequest::PrSummary(r) if r.pr_number == 12));
    }

    #[test]
    fn test_step_index_clamps() {
        assert_eq!(step_index(0, -1, 3), 0);
        assert_eq!(step_index(2, 1, 3), 2);
        assert_eq!(step_index(1, 1, 0), 0);
    }
}
