//! Command-line surface of the `katalyst` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use katalyst_client::Config;
use katalyst_protocol::ChatTopic;

#[derive(Parser, Debug)]
#[command(name = "katalyst", version, about = "Katalyst GitHub analytics console")]
pub struct Cli {
    #[arg(long, global = true, help = "Backend origin, e.g. http://localhost:8000")]
    pub api_url: Option<String>,
    #[arg(long, global = true, help = "Config file (default: <config_dir>/katalyst/config.toml)")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Interactive terminal dashboard (default).
    Console,
    /// Dashboard totals, top repositories and recent activity.
    Stats {
        #[arg(long, help = "Trend window in days (default from config)")]
        days: Option<u32>,
    },
    /// Contributors ranked by score, in server order.
    Leaderboard,
    /// Team health grades, workload and burnout risk.
    TeamHealth,
    /// Release readiness for one repository.
    Readiness { repo_id: i64 },
    /// Collaboration network nodes and edges.
    Network {
        #[arg(long)]
        repo_id: Option<i64>,
    },
    /// Commit analytics with AI summaries.
    Commits {
        #[arg(long)]
        repo_id: Option<i64>,
        #[arg(long)]
        contributor_id: Option<i64>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Per-contributor commit summaries.
    Summaries {
        #[arg(long)]
        repo_id: Option<i64>,
    },
    /// Contributor stats and burnout report.
    Contributor {
        id: i64,
        #[arg(long, help = "Ask the backend to award any earned badges first")]
        award_badges: bool,
    },
    /// Full triage: classification, duplicates and assignee.
    Triage {
        #[arg(long)]
        repo_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,
    },
    /// Classification only.
    Classify {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    /// Chatbot reports, printed as markdown.
    Chat {
        #[arg(value_enum)]
        topic: ChatTopicArg,
        #[arg(long, help = "PR number (pr-summary)")]
        pr: Option<u64>,
        #[arg(long, help = "Repository name (pr-summary)")]
        repo: Option<String>,
        #[arg(long, help = "Repository id (team-health)")]
        repo_id: Option<i64>,
    },
    /// Import a GitHub repository by URL or owner/repo.
    Import {
        url: String,
        #[arg(long, help = "Token for private repositories")]
        github_token: Option<String>,
    },
    /// GitHub App installations, or one installation's repositories.
    Installations {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long, requires = "id", help = "Bulk-import every repository not yet imported")]
        import_all: bool,
    },
    /// Repositories hosted on the backend's git server.
    Git {
        #[command(subcommand)]
        action: GitCommand,
    },
    /// Print live activity events as they arrive.
    Stream,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum GitCommand {
    /// List an owner's hosted repositories.
    List { owner: String },
    /// List a directory and the latest commits.
    Browse {
        #[arg(help = "owner/repo")]
        repo: String,
        #[arg(long, default_value = "main")]
        branch: String,
        #[arg(long, default_value = "")]
        path: String,
    },
    /// Print one file.
    Cat {
        #[arg(help = "owner/repo")]
        repo: String,
        path: String,
        #[arg(long, default_value = "main")]
        branch: String,
    },
    /// Create an empty hosted repository.
    Create {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

/// Split `owner/repo`.
pub fn split_repo(repo: &str) -> Option<(&str, &str)> {
    let (owner, name) = repo.trim().split_once('/')?;
    (!owner.is_empty() && !name.is_empty() && !name.contains('/')).then_some((owner, name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChatTopicArg {
    PrSummary,
    TeamHealth,
    DailyDigest,
    RiskAlerts,
}

impl From<ChatTopicArg> for ChatTopic {
    fn from(arg: ChatTopicArg) -> Self {
        match arg {
            ChatTopicArg::PrSummary => ChatTopic::PrSummary,
            ChatTopicArg::TeamHealth => ChatTopic::TeamHealth,
            ChatTopicArg::DailyDigest => ChatTopic::DailyDigest,
            ChatTopicArg::RiskAlerts => ChatTopic::RiskAlerts,
        }
    }
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Console)
    }

    pub fn is_console(&self) -> bool {
        self.command() == Commands::Console
    }

    /// File, then environment, then flags.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
            config.validate()?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_repo() {
        assert_eq!(split_repo("ada/engine"), Some(("ada", "engine")));
        assert_eq!(split_repo("engine"), None);
        assert_eq!(split_repo("a/b/c"), None);
        assert_eq!(split_repo("/engine"), None);
    }

    #[test]
    fn test_git_browse_defaults() {
        let cli = Cli::try_parse_from(["katalyst", "git", "browse", "ada/engine"]).unwrap();
        assert_eq!(
            cli.command(),
            Commands::Git {
                action: GitCommand::Browse {
                    repo: "ada/engine".into(),
                    branch: "main".into(),
                    path: String::new(),
                }
            }
        );
    }

    #[test]
    fn test_git_list_takes_owner() {
        let cli = Cli::try_parse_from(["katalyst", "git", "list", "ada"]).unwrap();
        assert_eq!(
            cli.command(),
            Commands::Git {
                action: GitCommand::List { owner: "ada".into() }
            }
        );
    }

    #[test]
    fn test_every_subcommand_has_help() {
        use clap::CommandFactory;
        let cmd = <Cli as CommandFactory>::command();
        for sub in cmd.get_subcommands() {
            assert!(sub.get_about().is_some(), "{} has no help text", sub.get_name());
        }
    }

    #[test]
    fn test_default_command_is_console() {
        let cli = Cli::try_parse_from(["katalyst"]).unwrap();
        assert!(cli.is_console());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "katalyst",
            "commits",
            "--repo-id",
            "3",
            "--json",
            "--api-url",
            "http://backend:8000",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.api_url.as_deref(), Some("http://backend:8000"));
        assert_eq!(
            cli.command(),
            Commands::Commits {
                repo_id: Some(3),
                contributor_id: None,
                limit: None
            }
        );
    }

    #[test]
    fn test_chat_topic_values() {
        let cli = Cli::try_parse_from(["katalyst", "chat", "risk-alerts"]).unwrap();
        match cli.command() {
            Commands::Chat { topic, .. } => assert_eq!(ChatTopic::from(topic), ChatTopic::RiskAlerts),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_triage_labels_split_on_commas() {
        let cli = Cli::try_parse_from([
            "katalyst", "triage", "--repo-id", "1", "--title", "Crash", "--labels", "bug,ui",
        ])
        .unwrap();
        match cli.command() {
            Commands::Triage { labels, .. } => assert_eq!(labels, vec!["bug", "ui"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_flag_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = \"http://file:8000\"\ncommit_limit = 10\n").unwrap();
        let cli = Cli::try_parse_from([
            "katalyst",
            "--config",
            path.to_str().unwrap(),
            "--api-url",
            "http://flag:8000",
            "leaderboard",
        ])
        .unwrap();
        let config = cli.load_config().unwrap();
        assert_eq!(config.api_url, "http://flag:8000");
        assert_eq!(config.commit_limit, 10);
    }
}
