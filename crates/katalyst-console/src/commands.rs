//! One-shot subcommands: fetch, print, exit.

use katalyst_client::{ClientError, Config, KatalystClient, LiveStream};
use katalyst_protocol::*;
use katalyst_views::{
    first_line, group_thousands, rank_label, relative_time, short_datetime, title_case_key,
    CommitFilters, ReadinessBand,
};
use serde::Serialize;

use crate::cli::{split_repo, Commands, GitCommand};

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

fn print_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&JsonOut { ok: true, data })?);
    Ok(())
}

/// Print `data` as JSON, or as the lines produced by `text`.
fn print_one<T: Serialize>(json: bool, data: T, text: impl Fn(&T) -> Vec<String>) -> anyhow::Result<()> {
    if json {
        print_json(data)
    } else {
        for line in text(&data) {
            println!("{line}");
        }
        Ok(())
    }
}

pub async fn run(command: Commands, config: &Config, json: bool) -> anyhow::Result<()> {
    let client = KatalystClient::new(config)?;
    tracing::debug!(api = %client.base_url(), ?command, "running command");

    match command {
        Commands::Console => unreachable_console(),
        Commands::Stats { days } => {
            let days = days.unwrap_or(config.trend_days);
            let (stats, trends) =
                tokio::try_join!(client.dashboard_stats(), client.activity_trends(days))?;
            if json {
                return print_json(serde_json::json!({ "stats": stats, "trends": trends }));
            }
            for line in stats_lines(&stats, &trends, days) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Leaderboard => {
            let board = client.leaderboard().await?;
            print_one(json, board, |b| leaderboard_lines(&b.leaderboard))
        }
        Commands::TeamHealth => {
            let report = client.team_health().await?;
            print_one(json, report, team_health_lines)
        }
        Commands::Readiness { repo_id } => {
            let dashboard = client.release_dashboard(repo_id).await?;
            print_one(json, dashboard, readiness_lines)
        }
        Commands::Network { repo_id } => {
            let graph = client.collaboration_network(repo_id).await?;
            print_one(json, graph, network_lines)
        }
        Commands::Commits {
            repo_id,
            contributor_id,
            limit,
        } => {
            let filters = CommitFilters {
                repo_id,
                contributor_id,
                limit: limit.unwrap_or(config.commit_limit),
            };
            let analytics = client.commit_analytics(&filters.query()).await?;
            print_one(json, analytics, |a| commit_lines(&a.commits))
        }
        Commands::Summaries { repo_id } => {
            let summaries = client.contributor_summaries(repo_id).await?;
            print_one(json, summaries, summary_lines)
        }
        Commands::Contributor { id, award_badges } => {
            let award = if award_badges {
                let award = client.award_badges(id).await?;
                if !json {
                    println!("Awarded {} new badge(s)", award.count);
                }
                Some(award)
            } else {
                None
            };
            let (stats, burnout) =
                tokio::try_join!(client.contributor_stats(id), client.contributor_burnout(id))?;
            if json {
                return print_json(contributor_json(&stats, &burnout, award.as_ref())?);
            }
            for line in contributor_lines(&stats, &burnout) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Triage {
            repo_id,
            title,
            body,
            labels,
        } => {
            let request = TriageRequest {
                repository_id: repo_id,
                issue_data: IssueDraft { title, body, labels },
            };
            let result = client.triage_issue(&request).await?;
            print_one(json, result, triage_lines)
        }
        Commands::Classify { title, body } => {
            let draft = IssueDraft {
                title,
                body,
                labels: Vec::new(),
            };
            let classification = client.classify_issue(&draft).await?;
            print_one(json, TriageResult::from_classification(classification), triage_lines)
        }
        Commands::Chat {
            topic,
            pr,
            repo,
            repo_id,
        } => {
            let request = chat_request(topic.into(), pr, repo, repo_id)?;
            let document = client.chat(&request).await?;
            print_one(json, document, |d| vec![d.clone()])
        }
        Commands::Import { url, github_token } => {
            let resp = client.import_repository(&url, github_token.as_deref()).await?;
            print_one(json, resp, |r| {
                let name = r.repository.as_ref().map_or(url.as_str(), |repo| repo.name.as_str());
                vec![r.message.clone().unwrap_or_else(|| format!("Imported {name}"))]
            })
        }
        Commands::Installations { id: None, .. } => {
            let installs = client.installations().await?;
            if installs.installations.is_empty() && !json {
                let url = client.install_url().await?;
                println!("No installations. Install the GitHub App: {}", url.install_url);
                return Ok(());
            }
            print_one(json, installs, |i| {
                i.installations
                    .iter()
                    .map(|inst| format!("{:>8}  {} ({})", inst.id, inst.account_login, inst.account_type))
                    .collect()
            })
        }
        Commands::Installations {
            id: Some(id),
            import_all,
        } => {
            let repos = client.installation_repositories(id).await?;
            if import_all {
                let ids: Vec<i64> = repos.importable().map(|r| r.id).collect();
                let summary = client.bulk_import(id, ids).await?;
                return print_one(json, summary, |s| {
                    vec![format!(
                        "Imported {} of {} repositories ({} failed)",
                        s.success, s.total, s.failed
                    )]
                });
            }
            print_one(json, repos, installation_repo_lines)
        }
        Commands::Git { action } => git(&client, action, json).await,
        Commands::Stream => stream(&client, json).await,
    }
}

async fn git(client: &KatalystClient, action: GitCommand, json: bool) -> anyhow::Result<()> {
    let owner_repo = |repo: &str| {
        split_repo(repo)
            .map(|(o, r)| (o.to_string(), r.to_string()))
            .ok_or_else(|| ClientError::InvalidInput(format!("expected owner/repo, got '{repo}'")))
    };
    match action {
        GitCommand::List { owner } => {
            let list = client.git_repositories(&owner).await?;
            print_one(json, list, git_repository_lines)
        }
        GitCommand::Browse { repo, branch, path } => {
            let (owner, name) = owner_repo(&repo)?;
            let listing = client.git_browse(&owner, &name, &branch, &path).await?;
            print_one(json, listing, git_browse_lines)
        }
        GitCommand::Cat { repo, path, branch } => {
            let (owner, name) = owner_repo(&repo)?;
            let file = client.git_file(&owner, &name, &branch, &path).await?;
            print_one(json, file, |f| vec![f.content.clone()])
        }
        GitCommand::Create { name, description } => {
            let created = client.git_create(&name, &description).await?;
            print_one(json, created, |_| vec![format!("Created repository {name}")])
        }
    }
}

/// `stats` and `burnout`, plus `award` when badges were awarded first.
fn contributor_json(
    stats: &ContributorStats,
    burnout: &BurnoutReport,
    award: Option<&BadgeAward>,
) -> serde_json::Result<serde_json::Value> {
    let mut out = serde_json::json!({ "stats": stats, "burnout": burnout });
    if let Some(award) = award {
        out["award"] = serde_json::to_value(award)?;
    }
    Ok(out)
}

fn unreachable_console() -> anyhow::Result<()> {
    anyhow::bail!("the console is started by main, not as a one-shot command")
}

fn chat_request(
    topic: ChatTopic,
    pr: Option<u64>,
    repo: Option<String>,
    repo_id: Option<i64>,
) -> Result<ChatRequest, ClientError> {
    Ok(match topic {
        ChatTopic::PrSummary => match (pr, repo) {
            (Some(pr_number), Some(repository_name)) => ChatRequest::PrSummary(PrSummaryRequest {
                pr_number,
                repository_name,
            }),
            _ => {
                return Err(ClientError::InvalidInput(
                    "pr-summary needs --pr and --repo".into(),
                ))
            }
        },
        ChatTopic::TeamHealth => ChatRequest::TeamHealth {
            repository_id: repo_id,
        },
        ChatTopic::DailyDigest => ChatRequest::DailyDigest,
        ChatTopic::RiskAlerts => ChatRequest::RiskAlerts,
    })
}

async fn stream(client: &KatalystClient, json: bool) -> anyhow::Result<()> {
    let mut events = LiveStream::connect(client).await?;
    while let Some(event) = events.next_event().await {
        let event = event?;
        if json {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }
        match event.kind {
            EventKind::Connected => eprintln!("connected: {}", event.message.as_deref().unwrap_or("")),
            EventKind::Heartbeat => {}
            _ => {
                let when = event
                    .occurred_at()
                    .map(|t| relative_time(t, chrono::Utc::now()))
                    .unwrap_or_default();
                println!("{:>8}  {}", when, event.payload());
            }
        }
    }
    eprintln!("stream closed");
    Ok(())
}

// ── Text renderings ────────────────────────────────────────────

pub fn stats_lines(stats: &DashboardStats, trends: &ActivityTrends, days: u32) -> Vec<String> {
    let t = &stats.totals;
    let mut out = vec![
        format!(
            "Repositories {}  Contributors {} ({} active)  Commits {}  Issues {}",
            group_thousands(t.repositories as i64),
            group_thousands(t.contributors as i64),
            group_thousands(t.active_contributors as i64),
            group_thousands(t.commits as i64),
            group_thousands(t.issues as i64),
        ),
        format!(
            "Last {days} days: {} commits, {} issues",
            trends.total_commits(),
            trends.total_issues()
        ),
    ];
    if !stats.top_repositories.is_empty() {
        out.push(String::new());
        out.push("Top repositories".to_string());
        for repo in &stats.top_repositories {
            out.push(format!(
                "  {:<30} health {:>5.1}  ★{}",
                repo.name, repo.health_score, repo.stars
            ));
        }
    }
    if !stats.recent_activities.is_empty() {
        out.push(String::new());
        out.push("Recent activity".to_string());
        for act in &stats.recent_activities {
            out.push(format!(
                "  {}  {} {} in {}",
                short_datetime(act.timestamp.as_deref().unwrap_or("")),
                act.contributor_username,
                act.activity_type,
                act.repository_name
            ));
        }
    }
    out
}

pub fn leaderboard_lines(entries: &[LeaderboardEntry]) -> Vec<String> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "{:>4}  {:<20} L{:<3} {:>10} pts  {} commits  {}d streak",
                rank_label(i + 1),
                e.username,
                e.level,
                group_thousands(e.total_score),
                e.total_commits,
                e.activity_streak
            )
        })
        .collect()
}

fn team_health_lines(report: &TeamHealthReport) -> Vec<String> {
    let s = &report.overall_stats;
    let mut out = vec![format!(
        "{} members: {} healthy, {} warning, {} at risk",
        s.total_members, s.healthy_count, s.warning_count, s.at_risk_count
    )];
    for m in &report.team_health {
        let h = &m.overall_health;
        out.push(format!(
            "  {:<20} grade {:<3} {:>5.1}  workload {:>5.1}  burnout {:>5.1}  {}",
            m.username,
            h.health_grade,
            h.score,
            m.metrics.workload.score,
            m.metrics.burnout_risk.score,
            h.status
        ));
    }
    for rec in &report.team_recommendations {
        out.push(format!("  [{}] {}", rec.priority, rec.message));
    }
    out
}

fn readiness_lines(dashboard: &ReleaseDashboard) -> Vec<String> {
    let c = &dashboard.current;
    let mut out = vec![
        format!(
            "{}: {:.0}/100 ({})  {}",
            c.repository.name,
            c.score,
            ReadinessBand::for_score(c.score),
            if c.can_release { "ready to release" } else { "not ready" }
        ),
        c.recommendation.clone(),
    ];
    out.extend(c.blockers.iter().map(|b| format!("  blocker: {b}")));
    out.extend(c.warnings.iter().map(|w| format!("  warning: {w}")));
    if let Some(delta) = dashboard.trend.delta() {
        out.push(format!("Trend: {:+.1} ({})", delta, dashboard.trend.trend_direction));
    }
    for (key, value) in &c.detailed_metrics {
        out.push(format!("  {:<28} {}", title_case_key(key), value));
    }
    out
}

fn network_lines(graph: &CollaborationGraph) -> Vec<String> {
    let mut out: Vec<String> = graph
        .nodes
        .iter()
        .map(|n| {
            format!(
                "  {:<20} L{:<3} {:>10}  {} collaborations",
                n.name,
                n.level,
                group_thousands(n.score),
                graph.collaborations_of(n.id)
            )
        })
        .collect();
    out.insert(0, format!("{} contributors, {} links", graph.nodes.len(), graph.edges.len()));
    out
}

fn commit_lines(commits: &[AnalyticsCommit]) -> Vec<String> {
    commits
        .iter()
        .map(|c| {
            format!(
                "{}  {:<16} {:<20} +{:<5} -{:<5} {}",
                short_datetime(c.committed_at.as_deref().unwrap_or("")),
                c.contributor.username,
                c.repository.name,
                c.additions,
                c.deletions,
                first_line(&c.summary)
            )
        })
        .collect()
}

fn summary_lines(summaries: &ContributorSummaries) -> Vec<String> {
    let mut out = vec![format!(
        "{} contributors, {} commits",
        summaries.contributors.len(),
        summaries.total_commits()
    )];
    for s in &summaries.contributors {
        out.push(format!(
            "{} ({} commits, +{} -{})",
            s.contributor.username, s.stats.total_commits, s.stats.total_additions, s.stats.total_deletions
        ));
        if !s.work_summary.is_empty() {
            out.push(format!("  {}", s.work_summary));
        }
    }
    out
}

fn contributor_lines(stats: &ContributorStats, burnout: &BurnoutReport) -> Vec<String> {
    let c = &stats.contributor;
    let mut out = vec![
        format!("{}  level {}  {} pts", c.username, c.level, group_thousands(c.total_score)),
        format!(
            "Burnout risk: {} ({:.0}%)",
            burnout.risk_level.to_uppercase(),
            burnout.risk_score * 100.0
        ),
    ];
    out.extend(burnout.recommendations.iter().map(|r| format!("  - {r}")));
    if !stats.badges.is_empty() {
        let names: Vec<String> = stats.badges.iter().map(|b| b.display_name()).collect();
        out.push(format!("Badges: {}", names.join(", ")));
    }
    out
}

pub fn triage_lines(result: &TriageResult) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(c) = &result.classification {
        out.push(format!(
            "Type {}  priority {}  complexity {}  confidence {:.0}%",
            c.kind,
            c.priority,
            c.complexity,
            c.confidence * 100.0
        ));
        if !c.component.is_empty() {
            out.push(format!("Component: {}", c.component));
        }
        if !c.estimated_effort.is_empty() {
            out.push(format!("Estimated effort: {} hours", c.estimated_effort));
        }
        if !c.reasoning.is_empty() {
            out.push(c.reasoning.clone());
        }
    }
    if !result.labels.is_empty() {
        out.push(format!("Labels: {}", result.labels.join(", ")));
    }
    if let Some(d) = result.duplicate_detection.as_ref().filter(|d| d.is_duplicate) {
        out.push(format!("Possible duplicate of #{}", d.duplicate_of));
    }
    if let Some(a) = &result.assignment {
        if let Some(who) = &a.assignee {
            out.push(format!("Suggested assignee: {who} ({:.0}%)", a.confidence * 100.0));
        }
    }
    if !result.auto_actions.is_empty() {
        let actions: Vec<String> = result.auto_actions.iter().map(|a| title_case_key(a)).collect();
        out.push(format!("Auto actions: {}", actions.join(", ")));
    }
    out
}

fn git_browse_lines(listing: &GitBrowse) -> Vec<String> {
    let mut out = vec![listing.repository.clone()];
    for entry in &listing.files {
        let marker = if entry.is_directory() { "/" } else { "" };
        out.push(format!("  {:>8}  {}{marker}", entry.size, entry.name));
    }
    if !listing.recent_commits.is_empty() {
        out.push(String::new());
        for commit in &listing.recent_commits {
            out.push(format!(
                "  {}  {:<16} {}",
                commit.short_sha(),
                commit.author,
                first_line(&commit.message)
            ));
        }
    }
    out
}

fn git_repository_lines(list: &HostedRepositories) -> Vec<String> {
    if list.repositories.is_empty() {
        return vec![format!("{} has no hosted repositories", list.username)];
    }
    list.repositories
        .iter()
        .map(|r| {
            let last = r.last_commit.as_ref().map_or_else(
                || "no commits".to_string(),
                |c| format!("{} {}", c.short_sha(), first_line(&c.message)),
            );
            format!("{:<30} [{}]  {}", r.name, r.branches.join(", "), last)
        })
        .collect()
}

fn installation_repo_lines(repos: &InstallationRepositories) -> Vec<String> {
    repos
        .repositories
        .iter()
        .map(|r| {
            format!(
                "{:>10}  {:<30} {:<12} ★{:<5} {}",
                r.id,
                r.name,
                r.language,
                r.stargazers_count,
                if r.is_imported { "imported" } else { "" }
            )
        })
        .collect()
}
