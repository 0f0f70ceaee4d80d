//! Frame rendering for the dashboard console.
//!
//! Layout, top to bottom: status bar, page tabs, the current page, console
//! output and the input line. Every page renders whatever data it holds,
//! fresh or stale, under an error banner when the last fetch failed.

use chrono::Utc;
use katalyst_client::{FeedStatus, LiveFeed};
use katalyst_protocol::*;
use katalyst_views::*;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table, Tabs, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::commands::triage_lines;
use crate::palette::{edge_color, node_color, tone_color};

/// Canvas units per terminal cell.
const CELL_WIDTH: f64 = 4.0;
const CELL_HEIGHT: f64 = 8.0;

struct Areas {
    status: Rect,
    tabs: Rect,
    main: Rect,
    output: Rect,
    input: Rect,
}

fn screen_layout(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(4),
        ])
        .split(area);
    Areas {
        status: chunks[0],
        tabs: chunks[1],
        main: chunks[2],
        output: chunks[3],
        input: chunks[4],
    }
}

fn network_panes(main: Rect) -> (Rect, Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(main);
    (cols[0], cols[1])
}

/// Drawable area of the network graph for a given terminal size.
pub fn network_canvas(screen: Rect) -> Rect {
    let (graph, _) = network_panes(screen_layout(screen).main);
    graph.inner(Margin {
        horizontal: 1,
        vertical: 1,
    })
}

/// Canvas width and height in layout units.
pub fn canvas_size(canvas: Rect) -> (f64, f64) {
    (
        f64::from(canvas.width) * CELL_WIDTH,
        f64::from(canvas.height) * CELL_HEIGHT,
    )
}

/// Map a terminal cell to the layout point at its centre.
pub fn cell_to_canvas(canvas: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
    if column < canvas.x
        || row < canvas.y
        || column >= canvas.x + canvas.width
        || row >= canvas.y + canvas.height
    {
        return None;
    }
    let x = f64::from(column - canvas.x) * CELL_WIDTH + CELL_WIDTH / 2.0;
    let y = f64::from(row - canvas.y) * CELL_HEIGHT + CELL_HEIGHT / 2.0;
    Some((x, y))
}

pub fn draw(frame: &mut Frame, app: &App, feed: &LiveFeed) {
    let areas = screen_layout(frame.area());
    render_status_bar(frame, areas.status, app, feed);
    render_tabs(frame, areas.tabs, app);
    match app.page {
        Page::Overview => render_overview(frame, areas.main, app),
        Page::Leaderboard => render_leaderboard(frame, areas.main, app),
        Page::Contributor => render_contributor(frame, areas.main, app),
        Page::TeamHealth => render_team_health(frame, areas.main, app),
        Page::Readiness => render_readiness(frame, areas.main, app),
        Page::Network => render_network(frame, areas.main, app),
        Page::Commits => render_commits(frame, areas.main, app),
        Page::Summaries => render_summaries(frame, areas.main, app),
        Page::Triage => render_triage(frame, areas.main, app),
        Page::Chat => render_chat(frame, areas.main, app),
        Page::Live => render_live(frame, areas.main, feed),
        Page::Import => render_import(frame, areas.main, app),
        Page::Installations => render_installations(frame, areas.main, app),
    }
    render_console_output(frame, areas.output, app);
    render_input(frame, areas.input, app);
}

// ── Chrome ─────────────────────────────────────────────────────

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, feed: &LiveFeed) {
    let block = Block::default()
        .title(" Katalyst Dashboard ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let feed_color = match feed.status() {
        FeedStatus::Connected => Color::Green,
        FeedStatus::Connecting => Color::Yellow,
        FeedStatus::Disconnected(_) => Color::Red,
    };
    let repo = app
        .repo_filter
        .map_or_else(|| "all".to_string(), |id| id.to_string());

    let status_line = Line::from(vec![
        Span::styled("  API: ", Style::default().fg(Color::Gray)),
        Span::styled(app.client().base_url().as_str(), Style::default().fg(Color::White)),
        Span::styled("  |  Page: ", Style::default().fg(Color::Gray)),
        Span::styled(app.page.title(), Style::default().fg(Color::Cyan)),
        Span::styled("  |  Repository: ", Style::default().fg(Color::Gray)),
        Span::styled(repo, Style::default().fg(Color::Magenta)),
        Span::styled("  |  Feed: ", Style::default().fg(Color::Gray)),
        Span::styled(feed.status().to_string(), Style::default().fg(feed_color)),
    ]);
    frame.render_widget(Paragraph::new(status_line).block(block), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<String> = Page::ALL
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {}", i + 1, p.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.page.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn render_console_output(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Console Output ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner_height = area.height.saturating_sub(2) as usize;
    let start = app.console_messages.len().saturating_sub(inner_height);
    let lines: Vec<Line> = app.console_messages[start..]
        .iter()
        .map(|(ts, msg, color)| {
            Line::from(vec![
                Span::styled(
                    format!("  [{}] ", ts.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(msg.as_str(), Style::default().fg(*color)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let focused = match app.page {
        Page::Triage => app.triage_form.fields.get(app.triage_form.focus),
        Page::Chat => app.chat.form.fields.get(app.chat.form.focus),
        _ => None,
    };
    let title = match focused {
        Some(field) => format!(" {} (Enter = set field, /help = commands) ", field.label),
        None => " Command Input (/help = commands, /quit = exit) ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let input_line = if app.input.is_empty() {
        let placeholder = match app.page {
            Page::Import => "GitHub URL or owner/repo...",
            _ => "Type /command...",
        };
        Line::from(vec![
            Span::styled("  > ", Style::default().fg(Color::Green)),
            Span::styled(placeholder, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("  > ", Style::default().fg(Color::Green)),
            Span::styled(app.input.as_str(), Style::default().fg(Color::White)),
        ])
    };
    let hint = Line::from(Span::styled(
        "  Tab pages  |  r refresh  |  Up/Down move  |  Enter select  |  Ctrl+C exit",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(vec![input_line, hint]).block(block), area);

    frame.set_cursor_position((area.x + 4 + app.cursor_pos as u16, area.y + 1));
}

// ── Shared helpers ─────────────────────────────────────────────

fn page_block(title: &str, loading: bool) -> Block<'static> {
    let title = if loading {
        format!(" {title} (loading...) ")
    } else {
        format!(" {title} ")
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue))
}

/// Draw the error banner when the last fetch failed; returns the area left.
fn banner<T>(frame: &mut Frame, area: Rect, data: &Loadable<T>) -> Rect {
    let Some(error) = data.error() else {
        return area;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let stale = if data.data().is_some() {
        "  (showing last loaded data)"
    } else {
        ""
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" ✖ {error}"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(stale, Style::default().fg(Color::DarkGray)),
        ])),
        chunks[0],
    );
    chunks[1]
}

fn placeholder<T>(frame: &mut Frame, area: Rect, block: Block, data: &Loadable<T>) {
    let msg = if data.is_loading() {
        "  Loading..."
    } else if data.error().is_some() {
        "  Nothing to show."
    } else {
        "  Press r to load."
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(msg, Style::default().fg(Color::DarkGray))))
            .block(block),
        area,
    );
}

fn empty(frame: &mut Frame, area: Rect, block: Block, msg: &str) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("  {msg}"),
            Style::default().fg(Color::DarkGray),
        )))
        .block(block),
        area,
    );
}

fn header(cells: Vec<&'static str>) -> Row<'static> {
    Row::new(cells).style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))
}

fn cell(text: impl Into<String>, color: Color) -> Cell<'static> {
    Cell::from(Span::styled(text.into(), Style::default().fg(color)))
}

fn toned(text: impl Into<String>, tone: Tone) -> Cell<'static> {
    cell(text, tone_color(tone))
}

fn cursor_style(selected: bool) -> Style {
    if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    }
}

fn plain(lines: Vec<String>) -> Vec<Line<'static>> {
    lines.into_iter().map(Line::from).collect()
}

// ── Contributor ────────────────────────────────────────────────

fn render_contributor(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.contributor;
    let area = banner(frame, area, &page.stats);
    let area = banner(frame, area, &page.burnout);
    let title = match (page.contributor_id, page.awarding) {
        (Some(id), true) => format!("Contributor #{id} (checking badges...)"),
        (Some(id), false) => format!("Contributor #{id} (Enter = check for new badges)"),
        (None, _) => "Contributor".to_string(),
    };
    let block = page_block(&title, page.stats.is_loading() || page.burnout.is_loading());
    if page.contributor_id.is_none() {
        empty(frame, area, block, "Pick a contributor with /who <id>.");
        return;
    }
    let Some(stats) = page.stats.data() else {
        placeholder(frame, area, block, &page.stats);
        return;
    };

    let weekly = page.burnout.data().map_or(&[][..], |b| b.weekly_activity.as_slice());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(4),
            Constraint::Length(if weekly.is_empty() { 0 } else { 4 }),
        ])
        .split(area);

    let c = &stats.contributor;
    let m = &stats.metrics;
    let tier = LevelTier::for_level(c.level);
    let mut headline = vec![
        Span::styled(format!("  {}  ", c.username), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("Level {} {:?}", c.level, tier), Style::default().fg(tone_color(tier.tone()))),
    ];
    if c.activity_streak > 0 {
        headline.push(Span::styled(
            format!("  🔥 {} day streak", c.activity_streak),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(hours) = c.preferred_work_hours.as_deref().filter(|h| !h.is_empty()) {
        headline.push(Span::styled(format!("  🌙 {hours} person"), Style::default().fg(Color::Gray)));
    }
    let mut profile = vec![Line::from(headline)];
    if let Some((xp, next, done)) = page.xp_progress() {
        profile.push(Line::from(vec![
            Span::raw(format!("  XP {} / {}  ", group_thousands(xp), group_thousands(next))),
            Span::styled(percent_bar(done, 20), Style::default().fg(Color::Cyan)),
        ]));
    }
    profile.push(Line::from(format!(
        "  Score {}   Commits {} ({} in last 30 days)   Issues closed {}   Reviews {}",
        group_thousands(c.total_score),
        m.total_commits,
        m.recent_commits_30d,
        m.total_issues_closed,
        m.total_prs_reviewed
    )));
    profile.push(Line::from(Span::styled(
        format!(
            "  Repositories {}   Active collaborations {}",
            m.repositories_count, m.collaborations_count
        ),
        Style::default().fg(Color::Gray),
    )));
    frame.render_widget(Paragraph::new(profile).block(block), rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    let burnout_block = Block::default()
        .title(" Burnout Risk ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue));
    match (page.burnout.data(), page.burnout_level()) {
        (Some(report), Some(level)) => {
            let mut lines = vec![Line::from(Span::styled(
                format!(
                    "  {} Risk Level: {}  {:.0}%",
                    level.emoji(),
                    report.risk_level.to_uppercase(),
                    report.risk_score * 100.0
                ),
                Style::default().fg(tone_color(level.tone())).add_modifier(Modifier::BOLD),
            ))];
            if report.recommendations.is_empty() {
                lines.push(Line::from(Span::styled(
                    "  No recommendations at this time.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.extend(report.recommendations.iter().map(|r| Line::from(format!("  • {r}"))));
            frame.render_widget(
                Paragraph::new(lines).block(burnout_block).wrap(Wrap { trim: false }),
                cols[0],
            );
        }
        _ => placeholder(frame, cols[0], burnout_block, &page.burnout),
    }

    let badge_block = Block::default()
        .title(format!(" Badges ({}) ", stats.badges.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue));
    let mut badges: Vec<Line> = if stats.badges.is_empty() {
        vec![Line::from(Span::styled(
            "  No badges yet. Press Enter to check for new badges.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        stats
            .badges
            .iter()
            .map(|b| {
                Line::from(vec![
                    Span::styled(format!("  🏆 {}", b.display_name()), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("  {}", short_datetime(b.earned_date.as_deref().unwrap_or(""))),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };
    if !c.skill_tags.is_empty() {
        badges.push(Line::from(""));
        badges.push(Line::from(Span::styled(
            format!("  Skills: {}", c.skill_tags.join(", ")),
            Style::default().fg(Color::Magenta),
        )));
    }
    frame.render_widget(
        Paragraph::new(badges).block(badge_block).wrap(Wrap { trim: false }),
        cols[1],
    );

    if !weekly.is_empty() {
        let spark = Sparkline::default()
            .block(
                Block::default()
                    .title(" Weekly Activity ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::LightBlue)),
            )
            .data(weekly)
            .style(Style::default().fg(Color::Green));
        frame.render_widget(spark, rows[2]);
    }
}

// ── Overview ───────────────────────────────────────────────────

fn render_overview(frame: &mut Frame, area: Rect, app: &App) {
    let area = banner(frame, area, &app.overview);
    let area = banner(frame, area, &app.stats);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(4)])
        .split(area);

    let loading = app.overview.is_loading() || app.stats.is_loading();
    let totals_block = page_block("Overview", loading);
    let mut lines = Vec::new();
    if let Some(snapshot) = app.overview.data() {
        let t = OverviewTotals::from_snapshot(snapshot);
        lines.push(Line::from(format!(
            "  Repositories {}   Contributors {}   Commits {}   Issues {}",
            group_thousands(t.repositories as i64),
            group_thousands(t.contributors as i64),
            group_thousands(t.commits as i64),
            group_thousands(t.issues as i64),
        )));
    }
    if let Some((stats, trends)) = app.stats.data() {
        lines.push(Line::from(Span::styled(
            format!(
                "  {} active contributors   last {} days: {} commits, {} issues",
                stats.totals.active_contributors,
                app.config.trend_days,
                trends.total_commits(),
                trends.total_issues()
            ),
            Style::default().fg(Color::Gray),
        )));
    }
    if lines.is_empty() {
        placeholder(frame, rows[0], totals_block, &app.overview);
    } else {
        frame.render_widget(Paragraph::new(lines).block(totals_block), rows[0]);
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[1]);

    let repo_block = page_block("Repositories (DORA)", false);
    match app.overview.data() {
        Some(snapshot) if !snapshot.repositories.is_empty() => {
            let table_rows: Vec<Row> = snapshot
                .repositories
                .iter()
                .map(|r| {
                    Row::new(vec![
                        cell(truncate(&r.name, 24), Color::White),
                        toned(format!("{:.0}", r.health_score), ReadinessBand::for_score(r.health_score).tone()),
                        cell(format!("{:.1}/wk", r.deployment_frequency), Color::Gray),
                        cell(format!("{:.1}h", r.lead_time_for_changes), Color::Gray),
                        cell(format!("{:.1}h", r.mean_time_to_recovery), Color::Gray),
                        cell(format!("{:.0}%", r.change_failure_rate), Color::Gray),
                        cell(format!("★{}", r.stars), Color::Yellow),
                    ])
                })
                .collect();
            let table = Table::new(
                table_rows,
                [
                    Constraint::Percentage(28),
                    Constraint::Length(7),
                    Constraint::Length(9),
                    Constraint::Length(8),
                    Constraint::Length(8),
                    Constraint::Length(6),
                    Constraint::Min(5),
                ],
            )
            .header(header(vec!["Name", "Health", "Deploys", "Lead", "MTTR", "CFR", "Stars"]))
            .block(repo_block);
            frame.render_widget(table, cols[0]);
        }
        Some(_) => empty(frame, cols[0], repo_block, "No repositories yet. Import one on the Import page."),
        None => placeholder(frame, cols[0], repo_block, &app.overview),
    }

    let side_block = page_block("Top contributors", false);
    match app.overview.data() {
        Some(snapshot) => {
            let mut lines: Vec<Line> = top_contributors(snapshot, 5)
                .into_iter()
                .enumerate()
                .map(|(i, c)| {
                    Line::from(vec![
                        Span::raw(format!(" {:>3} ", rank_label(i + 1))),
                        Span::styled(
                            truncate(&c.username, 18),
                            Style::default().fg(tone_color(LevelTier::for_level(c.level).tone())),
                        ),
                        Span::styled(
                            format!("  {} commits", contributor_commit_count(c)),
                            Style::default().fg(Color::Gray),
                        ),
                    ])
                })
                .collect();
            if let Some((stats, _)) = app.stats.data() {
                if !stats.recent_activities.is_empty() {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        " Recent activity",
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                    let now = Utc::now();
                    for act in &stats.recent_activities {
                        let when = act
                            .timestamp
                            .as_deref()
                            .and_then(parse_timestamp)
                            .map(|t| relative_time(t, now))
                            .unwrap_or_default();
                        lines.push(Line::from(format!(
                            " {:>8}  {} {} in {}",
                            when, act.contributor_username, act.activity_type, act.repository_name
                        )));
                    }
                }
            }
            frame.render_widget(Paragraph::new(lines).block(side_block), cols[1]);
        }
        None => placeholder(frame, cols[1], side_block, &app.overview),
    }
}

// ── Leaderboard ────────────────────────────────────────────────

fn render_leaderboard(frame: &mut Frame, area: Rect, app: &App) {
    let area = banner(frame, area, &app.leaderboard);
    let block = page_block("Leaderboard", app.leaderboard.is_loading());
    let Some(data) = app.leaderboard.data() else {
        placeholder(frame, area, block, &app.leaderboard);
        return;
    };
    if data.leaderboard.is_empty() {
        empty(frame, area, block, "No contributors ranked yet.");
        return;
    }
    let rows: Vec<Row> = data
        .leaderboard
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let tier = LevelTier::for_level(e.level);
            Row::new(vec![
                cell(format!("  {}", rank_label(i + 1)), Color::White),
                cell(e.username.clone(), Color::White),
                toned(format!("L{} {:?}", e.level, tier), tier.tone()),
                cell(group_thousands(e.total_score), Color::Cyan),
                cell(e.total_commits.to_string(), Color::Gray),
                cell(e.total_issues_closed.to_string(), Color::Gray),
                cell(e.total_prs_reviewed.to_string(), Color::Gray),
                cell(format!("{}d", e.activity_streak), Color::Yellow),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Percentage(24),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(6),
        ],
    )
    .header(header(vec!["  Rank", "Contributor", "Level", "Score", "Commits", "Issues", "Reviews", "Streak"]))
    .block(block);
    frame.render_widget(table, area);
}

// ── Team health ────────────────────────────────────────────────

fn render_team_health(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.team_health;
    let area = banner(frame, area, &page.report);
    let title = match page.view {
        TeamHealthView::Overview => "Team Health",
        TeamHealthView::Heatmap => "Team Health: heatmap",
    };
    let block = page_block(title, page.report.is_loading());
    let Some(report) = page.report.data() else {
        placeholder(frame, area, block, &page.report);
        return;
    };
    if report.team_health.is_empty() {
        empty(frame, area, block, "No team members to assess.");
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4), Constraint::Length(6)])
        .split(area);

    let s = &report.overall_stats;
    let stats = Line::from(vec![
        Span::raw(format!("  {} members  ", s.total_members)),
        Span::styled(format!("{} healthy  ", s.healthy_count), Style::default().fg(Color::Green)),
        Span::styled(format!("{} warning  ", s.warning_count), Style::default().fg(Color::Yellow)),
        Span::styled(format!("{} at risk  ", s.at_risk_count), Style::default().fg(Color::Red)),
        Span::styled(
            format!("avg workload {:.0}  avg burnout {:.0}", s.avg_workload, s.avg_burnout_risk),
            Style::default().fg(Color::Gray),
        ),
    ]);
    frame.render_widget(Paragraph::new(stats).block(block), rows[0]);

    if let Some(member) = page.detail_member() {
        render_member_detail(frame, rows[1], member);
    } else {
        match page.view {
            TeamHealthView::Overview => render_member_table(frame, rows[1], report, page.cursor),
            TeamHealthView::Heatmap => render_heatmap(frame, rows[1], report, page.cursor),
        }
    }

    let rec_block = page_block("Recommendations", false);
    let recs: Vec<Line> = report
        .team_recommendations
        .iter()
        .map(|r| {
            Line::from(vec![
                Span::styled(
                    format!("  [{}] ", r.priority),
                    Style::default().fg(tone_color(recommendation_tone(&r.priority))),
                ),
                Span::raw(r.message.clone()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(recs).block(rec_block).wrap(Wrap { trim: true }), rows[2]);
}

fn render_member_table(frame: &mut Frame, area: Rect, report: &TeamHealthReport, cursor: usize) {
    let rows: Vec<Row> = report
        .team_health
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let h = &m.overall_health;
            Row::new(vec![
                cell(format!("  {}", m.username), Color::White),
                toned(h.health_grade.clone(), grade_tone(&h.health_grade)),
                toned(format!("{:.0}", h.score), status_tone(&h.status)),
                toned(format!("{:.0}", m.metrics.workload.score), status_tone(&m.metrics.workload.status)),
                toned(format!("{:.0}", m.metrics.burnout_risk.score), status_tone(&m.metrics.burnout_risk.status)),
                toned(m.priority.clone(), recommendation_tone(&m.priority)),
            ])
            .style(cursor_style(i == cursor))
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Min(8),
        ],
    )
    .header(header(vec!["  Member", "Grade", "Health", "Workload", "Burnout", "Priority"]))
    .block(page_block("Members (Enter for details, v for heatmap)", false));
    frame.render_widget(table, area);
}

fn render_heatmap(frame: &mut Frame, area: Rect, report: &TeamHealthReport, cursor: usize) {
    let rows: Vec<Row> = report
        .team_health
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let metrics = &m.metrics;
            let mut cells = vec![cell(format!("  {}", m.username), Color::White)];
            for metric in [
                &metrics.workload,
                &metrics.burnout_risk,
                &metrics.review_latency,
                &metrics.code_churn,
                &metrics.collaboration,
            ] {
                let color = tone_color(status_tone(&metric.status));
                cells.push(Cell::from(format!("{:>5.0}", metric.score)).style(Style::default().bg(color).fg(Color::Black)));
            }
            Row::new(cells).style(cursor_style(i == cursor))
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .column_spacing(1)
    .header(header(vec!["  Member", "Workload", "Burnout", "Reviews", "Churn", "Collab"]))
    .block(page_block("Heatmap (v for overview)", false));
    frame.render_widget(table, area);
}

fn render_member_detail(frame: &mut Frame, area: Rect, member: &MemberHealth) {
    let h = &member.overall_health;
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("  {}", member.username), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  grade {}  {:.0}/100  {}", h.health_grade, h.score, h.status),
                Style::default().fg(tone_color(grade_tone(&h.health_grade))),
            ),
        ]),
        Line::from(""),
    ];
    let m = &member.metrics;
    for (name, metric) in [
        ("Workload", &m.workload),
        ("Burnout risk", &m.burnout_risk),
        ("Review latency", &m.review_latency),
        ("Code churn", &m.code_churn),
        ("Collaboration", &m.collaboration),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {name:<15} ")),
            Span::styled(
                format!("{} {:>5.1}", percent_bar(metric.score, 20), metric.score),
                Style::default().fg(tone_color(status_tone(&metric.status))),
            ),
        ]));
        if !metric.recommendation.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("      {}", metric.recommendation),
                Style::default().fg(Color::Gray),
            )));
        }
    }
    let block = page_block("Member detail (Esc to close)", false);
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

// ── Release readiness ──────────────────────────────────────────

fn render_readiness(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.readiness;
    let area = banner(frame, area, &page.dashboard);
    let title = format!("Release Readiness: {} (t for next tab)", page.tab.title());
    let block = page_block(&title, page.dashboard.is_loading());
    if page.repo_id.is_none() {
        empty(frame, area, block, "Pick a repository with /repo <id>.");
        return;
    }
    let Some(dashboard) = page.dashboard.data() else {
        placeholder(frame, area, block, &page.dashboard);
        return;
    };

    let c = &dashboard.current;
    let band = ReadinessBand::for_score(c.score);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("  {}  ", c.repository.name), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("{} {:.0}/100 {}", percent_bar(c.score, 25), c.score, band),
                Style::default().fg(tone_color(band.tone())),
            ),
            Span::styled(
                if c.can_release { "  ✔ ready to release" } else { "  ✖ not ready" },
                Style::default().fg(if c.can_release { Color::Green } else { Color::Red }),
            ),
        ]),
        Line::from(Span::styled(format!("  {}", c.recommendation), Style::default().fg(Color::Gray))),
        Line::from(""),
    ];

    match page.tab {
        ReadinessTab::Overview => {
            let s = &c.summary;
            lines.push(Line::from(format!(
                "  Checks: {} passed, {} failed of {}",
                s.passed_checks, s.failed_checks, s.total_checks
            )));
            for b in &c.blockers {
                lines.push(Line::from(Span::styled(format!("  ✖ {b}"), Style::default().fg(Color::Red))));
            }
            for w in &c.warnings {
                lines.push(Line::from(Span::styled(format!("  ⚠ {w}"), Style::default().fg(Color::Yellow))));
            }
            for p in &c.passed_checks {
                lines.push(Line::from(Span::styled(format!("  ✔ {p}"), Style::default().fg(Color::Green))));
            }
            for step in &dashboard.action_items.next_steps {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  [{}] ", step.priority),
                        Style::default().fg(tone_color(priority_tone(&step.priority))),
                    ),
                    Span::raw(format!("{}: {}", step.title, step.description)),
                ]));
                for item in &step.items {
                    lines.push(Line::from(format!("      - {item}")));
                }
            }
        }
        ReadinessTab::Trend => {
            let trend = &dashboard.trend;
            if let Some(delta) = trend.delta() {
                let color = if trend.is_improving() { Color::Green } else { Color::Red };
                lines.push(Line::from(Span::styled(
                    format!("  {:+.1} points, {}", delta, trend.trend_direction),
                    Style::default().fg(color),
                )));
            }
            if trend.trend.is_empty() {
                lines.push(Line::from(Span::styled("  No trend history yet.", Style::default().fg(Color::DarkGray))));
            }
            for point in &trend.trend {
                let band = ReadinessBand::for_score(point.score);
                lines.push(Line::from(vec![
                    Span::raw(format!("  {:<12} ", point.date)),
                    Span::styled(
                        format!("{} {:>5.1}", percent_bar(point.score, 30), point.score),
                        Style::default().fg(tone_color(band.tone())),
                    ),
                ]));
            }
        }
        ReadinessTab::Details => {
            for (key, value) in page.metric_rows() {
                lines.push(Line::from(format!("  {key:<32} {value}")));
            }
            for p in &c.penalties {
                lines.push(Line::from(Span::styled(
                    format!("  -{:.0}  {}", p.penalty, p.message),
                    Style::default().fg(Color::LightRed),
                )));
            }
        }
    }
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

// ── Collaboration network ──────────────────────────────────────

fn render_network(frame: &mut Frame, area: Rect, app: &App) {
    let (graph_area, side_area) = network_panes(area);
    let block = page_block("Collaboration Network (click or arrows to select)", app.network.is_loading());
    let Some(view) = app.network.data() else {
        let area = banner(frame, area, &app.network);
        placeholder(frame, area, block, &app.network);
        return;
    };
    if view.graph().is_empty() {
        empty(frame, graph_area, block, "No collaborations recorded.");
        return;
    }

    frame.render_widget(block, graph_area);
    let canvas_area = graph_area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let layout = view.layout();
    let (w, h) = (layout.width, layout.height);
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .paint(|ctx| {
            for edge in &layout.edges {
                let (a, b) = (&layout.nodes[edge.from], &layout.nodes[edge.to]);
                ctx.draw(&CanvasLine::new(a.x, h - a.y, b.x, h - b.y, edge_color(edge.opacity)));
            }
            ctx.layer();
            for node in &layout.nodes {
                ctx.draw(&Circle {
                    x: node.x,
                    y: h - node.y,
                    radius: node.radius,
                    color: node_color(view.tone_of(node)),
                });
            }
            ctx.layer();
            for node in &layout.nodes {
                if let Some(n) = view.node(node.id) {
                    let label = truncate(&n.name, 12);
                    let x = (node.x - label.chars().count() as f64 * CELL_WIDTH / 2.0).max(0.0);
                    ctx.print(x, h - node.y - node.radius - CELL_HEIGHT, Line::styled(label, Style::default().fg(Color::White)));
                }
            }
        });
    frame.render_widget(canvas, canvas_area);

    let side = banner(frame, side_area, &app.network);
    let side_block = page_block("Contributor", false);
    let lines = match view.selected_details() {
        Some(d) => vec![
            Line::from(Span::styled(format!("  {}", d.name), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(format!("  Level {}", d.level)),
            Line::from(format!("  Score {}", d.score)),
            Line::from(format!("  Collaborations {}", d.collaborations)),
        ],
        None => vec![Line::from(Span::styled(
            format!(
                "  {} contributors, {} links. Select a node.",
                view.graph().nodes.len(),
                view.graph().edges.len()
            ),
            Style::default().fg(Color::DarkGray),
        ))],
    };
    frame.render_widget(Paragraph::new(lines).block(side_block).wrap(Wrap { trim: true }), side);
}

// ── Commits ────────────────────────────────────────────────────

fn render_commits(frame: &mut Frame, area: Rect, app: &App) {
    let area = banner(frame, area, &app.commits);
    let f = &app.commit_filters;
    let title = format!(
        "Commits (repo {}, contributor {}, limit {})",
        f.repo_id.map_or("all".into(), |id| id.to_string()),
        f.contributor_id.map_or("all".into(), |id| id.to_string()),
        f.limit
    );
    let block = page_block(&title, app.commits.is_loading());
    let Some(data) = app.commits.data() else {
        placeholder(frame, area, block, &app.commits);
        return;
    };
    if data.commits.is_empty() {
        empty(frame, area, block, "No commits match these filters.");
        return;
    }
    let rows: Vec<Row> = data
        .commits
        .iter()
        .map(|c| {
            let size = CommitSize::for_changes(c.additions, c.deletions);
            Row::new(vec![
                cell(format!("  {}", short_datetime(c.committed_at.as_deref().unwrap_or(""))), Color::DarkGray),
                cell(c.contributor.username.clone(), Color::White),
                cell(c.repository.name.clone(), Color::Cyan),
                toned(format!("+{} -{}", c.additions, c.deletions), size.tone()),
                cell(c.files_changed.to_string(), Color::Gray),
                cell(first_line(&c.summary).to_string(), Color::White),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(16),
            Constraint::Length(18),
            Constraint::Length(14),
            Constraint::Length(6),
            Constraint::Min(20),
        ],
    )
    .header(header(vec!["  When", "Author", "Repository", "Changes", "Files", "Message"]))
    .block(block.title_bottom(format!(" {} total ", data.total)));
    frame.render_widget(table, area);
}

// ── Contributor summaries ──────────────────────────────────────

fn render_summaries(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.summaries;
    let area = banner(frame, area, &page.data);
    let block = page_block("Contributor Summaries (Enter to expand)", page.data.is_loading());
    let Some(data) = page.data.data() else {
        placeholder(frame, area, block, &page.data);
        return;
    };
    if data.contributors.is_empty() {
        empty(frame, area, block, "No contributor activity.");
        return;
    }
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "  {} contributors, {} commits",
            data.total_contributors.max(data.contributors.len() as u64),
            data.total_commits()
        ),
        Style::default().fg(Color::Gray),
    ))];
    for (i, s) in data.contributors.iter().enumerate() {
        let open = page.is_expanded(s.contributor.id);
        let marker = if open { "▼" } else { "▶" };
        lines.push(
            Line::from(vec![
                Span::raw(format!("  {marker} ")),
                Span::styled(s.contributor.username.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!(
                        "  {} commits  +{} -{}  {} files",
                        s.stats.total_commits, s.stats.total_additions, s.stats.total_deletions, s.stats.total_files_changed
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ])
            .style(cursor_style(i == page.cursor)),
        );
        if !open {
            continue;
        }
        if !s.work_summary.is_empty() {
            lines.push(Line::from(format!("      {}", s.work_summary)));
        }
        for c in &s.recent_commits {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("      +{:<4} -{:<4} ", c.additions, c.deletions),
                    Style::default().fg(tone_color(summary_commit_tone(c.additions, c.deletions))),
                ),
                Span::raw(truncate(first_line(&c.summary), 70)),
            ]));
        }
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Triage and chat ────────────────────────────────────────────

fn form_lines(form: &Form) -> Vec<Line<'static>> {
    form.fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == form.focus;
            let marker = if focused { "▶" } else { " " };
            let value = if field.value.is_empty() {
                Span::styled("(empty)", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled(field.value.clone(), Style::default().fg(Color::White))
            };
            let label_style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(format!("  {marker} {:<26}", field.label), label_style),
                value,
            ])
        })
        .collect()
}

fn render_triage(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(4)])
        .split(area);
    let mode = match app.triage_mode {
        TriageMode::Triage => "triage",
        TriageMode::Classify => "classify",
    };
    let form_block = page_block(&format!("Issue Triage ({mode}; Enter submits, /classify, /clear)"), false);
    frame.render_widget(Paragraph::new(form_lines(&app.triage_form)).block(form_block), rows[0]);

    let result_area = banner(frame, rows[1], &app.triage);
    let block = page_block("Result", app.triage.is_loading());
    match app.triage.data() {
        Some(result) => {
            let mut lines = Vec::new();
            if let Some(c) = &result.classification {
                lines.push(Line::from(vec![
                    Span::raw("  Priority "),
                    Span::styled(c.priority.clone(), Style::default().fg(tone_color(priority_tone(&c.priority)))),
                ]));
            }
            lines.extend(triage_lines(result).into_iter().map(|l| Line::from(format!("  {l}"))));
            frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), result_area);
        }
        None => empty(frame, result_area, block, "Fill in the form and press Enter."),
    }
}

fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let chat = &app.chat;
    let form_height = if chat.topic == ChatTopic::PrSummary { 5 } else { 3 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(form_height), Constraint::Min(4)])
        .split(area);

    let mut lines = vec![Line::from(vec![
        Span::styled("  Topic: ", Style::default().fg(Color::Gray)),
        Span::styled(chat.topic.title(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled("  (/topic to switch, Enter to ask)", Style::default().fg(Color::DarkGray)),
    ])];
    if chat.topic == ChatTopic::PrSummary {
        lines.extend(form_lines(&chat.form));
    }
    frame.render_widget(Paragraph::new(lines).block(page_block("Assistant", false)), rows[0]);

    let doc_area = banner(frame, rows[1], &chat.document);
    let block = page_block(chat.topic.title(), chat.document.is_loading());
    match chat.document.data() {
        Some(doc) => frame.render_widget(
            Paragraph::new(plain(doc.lines().map(|l| format!("  {l}")).collect()))
                .block(block)
                .wrap(Wrap { trim: false }),
            doc_area,
        ),
        None => placeholder(frame, doc_area, block, &chat.document),
    }
}

// ── Live feed ──────────────────────────────────────────────────

fn render_live(frame: &mut Frame, area: Rect, feed: &LiveFeed) {
    let title = format!("Live Activity: {}", feed.status());
    let block = page_block(&title, false);
    if feed.is_empty() {
        let msg = match feed.status() {
            FeedStatus::Disconnected(_) => "Feed disconnected. Restart the console to reconnect.",
            _ => "Waiting for events...",
        };
        empty(frame, area, block, msg);
        return;
    }
    let now = Utc::now();
    let lines: Vec<Line> = feed
        .entries()
        .map(|entry| {
            let color = match entry.event.kind {
                EventKind::Push => Color::Green,
                EventKind::PullRequest => Color::Magenta,
                EventKind::Issues => Color::Yellow,
                _ => Color::Gray,
            };
            Line::from(vec![
                Span::styled(
                    format!("  {:>8}  ", relative_time(entry.timestamp(), now)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(entry.message(), Style::default().fg(color)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ── Import and GitHub App ──────────────────────────────────────

fn render_import(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(4)])
        .split(area);

    let result_area = banner(frame, rows[0], &app.import_result);
    let block = page_block("Import Repository (type a URL, Enter)", app.import_result.is_loading());
    let line = match app.import_result.data() {
        Some(resp) => {
            let msg = resp
                .message
                .clone()
                .or_else(|| resp.repository.as_ref().map(|r| format!("Imported {}", r.name)))
                .unwrap_or_else(|| "Import complete".to_string());
            Line::from(Span::styled(format!("  ✔ {msg}"), Style::default().fg(Color::Green)))
        }
        None => Line::from(Span::styled(
            "  https://github.com/owner/repo or owner/repo",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line).block(block), result_area);

    let list_area = banner(frame, rows[1], &app.import_status);
    let block = page_block("Imported repositories", app.import_status.is_loading());
    let Some(status) = app.import_status.data() else {
        placeholder(frame, list_area, block, &app.import_status);
        return;
    };
    if status.repositories.is_empty() {
        empty(frame, list_area, block, "Nothing imported yet.");
        return;
    }
    let table_rows: Vec<Row> = status
        .repositories
        .iter()
        .map(|r| {
            Row::new(vec![
                cell(format!("  {}", r.id), Color::DarkGray),
                cell(r.full_name.clone().unwrap_or_else(|| r.name.clone()), Color::White),
                cell(r.primary_language.clone().unwrap_or_default(), Color::Cyan),
                cell(format!("★{}", r.stars), Color::Yellow),
                cell(r.updated_at.as_deref().map(short_datetime).unwrap_or_default(), Color::Gray),
            ])
        })
        .collect();
    let table = Table::new(
        table_rows,
        [
            Constraint::Length(8),
            Constraint::Percentage(40),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Min(16),
        ],
    )
    .header(header(vec!["  Id", "Repository", "Language", "Stars", "Updated"]))
    .block(block);
    frame.render_widget(table, list_area);
}

fn render_installations(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(4)])
        .split(area);

    let top = banner(frame, rows[0], &app.installations);
    let block = page_block("GitHub App installations (/install <id>)", app.installations.is_loading());
    match app.installations.data() {
        Some(resp) if resp.installations.is_empty() => {
            empty(frame, top, block, "No installations. Run `katalyst installations` for the install link.")
        }
        Some(resp) => {
            let lines: Vec<Line> = resp
                .installations
                .iter()
                .map(|inst| {
                    let active = app.install_page.installation_id == Some(inst.id);
                    Line::from(vec![
                        Span::raw(if active { "  ▶ " } else { "    " }),
                        Span::styled(format!("{:<10}", inst.id), Style::default().fg(Color::DarkGray)),
                        Span::styled(inst.account_login.clone(), Style::default().fg(Color::White)),
                        Span::styled(format!(" ({})", inst.account_type), Style::default().fg(Color::Gray)),
                    ])
                })
                .collect();
            frame.render_widget(Paragraph::new(lines).block(block), top);
        }
        None => placeholder(frame, top, block, &app.installations),
    }

    let page = &app.install_page;
    let list = banner(frame, rows[1], &page.repositories);
    let title = format!(
        "Repositories ({} picked; Enter toggles, /all, /bulk imports)",
        page.picked.len()
    );
    let block = page_block(&title, page.repositories.is_loading());
    let Some(repos) = page.repositories.data() else {
        placeholder(frame, list, block, &page.repositories);
        return;
    };
    if repos.repositories.is_empty() {
        empty(frame, list, block, "This installation has no repositories.");
        return;
    }
    let table_rows: Vec<Row> = repos
        .repositories
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mark = if r.is_imported {
                "✔"
            } else if page.picked.contains(&r.id) {
                "[x]"
            } else {
                "[ ]"
            };
            Row::new(vec![
                cell(format!("  {mark}"), if r.is_imported { Color::Green } else { Color::White }),
                cell(r.name.clone(), Color::White),
                cell(r.language.clone(), Color::Cyan),
                cell(format!("★{}", r.stargazers_count), Color::Yellow),
                cell(truncate(&r.description, 60), Color::Gray),
            ])
            .style(cursor_style(i == page.cursor))
        })
        .collect();
    let table = Table::new(
        table_rows,
        [
            Constraint::Length(6),
            Constraint::Percentage(28),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Min(20),
        ],
    )
    .header(header(vec!["  Pick", "Repository", "Language", "Stars", "Description"]))
    .block(block);
    frame.render_widget(table, list);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_canvas_maps_centres() {
        let canvas = Rect::new(2, 6, 10, 5);
        assert_eq!(cell_to_canvas(canvas, 2, 6), Some((2.0, 4.0)));
        assert_eq!(cell_to_canvas(canvas, 11, 10), Some((38.0, 36.0)));
        assert_eq!(cell_to_canvas(canvas, 12, 6), None);
        assert_eq!(cell_to_canvas(canvas, 1, 6), None);
    }

    #[test]
    fn test_canvas_size_in_layout_units() {
        assert_eq!(canvas_size(Rect::new(0, 0, 10, 5)), (40.0, 40.0));
    }

    #[test]
    fn test_network_canvas_inside_main_area() {
        let screen = Rect::new(0, 0, 120, 40);
        let canvas = network_canvas(screen);
        assert!(canvas.y > 4);
        assert!(canvas.x >= 1);
        assert!(canvas.width > 0 && canvas.height > 0);
        assert!(canvas.x + canvas.width < 120);
    }
}
