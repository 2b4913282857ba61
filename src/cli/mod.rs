//! CLI definitions and entry point.

use clap::{ArgAction, Parser};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::CliOverrides;

pub mod commands;

/// Default result ceiling for `-l/--limit`.
pub const DEFAULT_LIMIT: usize = 50;

/// Jira issues query tool
#[derive(Parser, Debug, Default)]
#[command(name = "jrquery", author, version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Free-text search terms (used with -s)
    pub terms: Vec<String>,

    /// Print the generated JQL before searching
    #[arg(short, long)]
    pub debug: bool,

    /// Only issues assigned to this user (`me` for yourself)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Only issues in this project key
    #[arg(short, long)]
    pub project: Option<String>,

    /// Search terms in summary; repeat to add description (-ss) and comments (-sss)
    #[arg(short, long, action = ArgAction::Count)]
    pub search: u8,

    /// Maximum number of issues to fetch
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Print only the number of matching issues
    #[arg(short, long)]
    pub count: bool,

    /// Only issues in open sprints
    #[arg(short = 'S', long)]
    pub sprint: bool,

    /// Only issues with this status name
    #[arg(short = 'e', long)]
    pub status: Option<String>,

    /// Only unresolved issues
    #[arg(short = 'O', long)]
    pub unresolved: bool,

    /// Accepted for compatibility; has no effect
    #[arg(short = 'A', long)]
    pub all: bool,

    /// Raw JQL query; overrides every other filter
    #[arg(short, long)]
    pub query: Option<String>,

    /// Search using a saved filter ID
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Open an issue in the browser
    #[arg(short, long, value_name = "KEY")]
    pub open: Option<String>,

    /// Order by last update: -T newest first, -TT oldest first
    #[arg(short = 'T', long, action = ArgAction::Count)]
    pub order_by_time: u8,

    /// List visible projects
    #[arg(long)]
    pub list_projects: bool,

    /// List active users
    #[arg(long)]
    pub list_users: bool,

    /// List saved filters
    #[arg(long)]
    pub list_filters: bool,

    /// Print the JQL of a saved filter
    #[arg(long, value_name = "ID")]
    pub print_filter: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the JQL that would be sent and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Config file path (default: ~/.config/jrquery.json)
    #[arg(long, env = "JRQUERY_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Increase logging verbosity (-v, -vv); the version is -V/--version
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// What a single invocation does, picked from the flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Completions(Shell),
    Open(String),
    ListProjects,
    ListUsers,
    ListFilters,
    PrintFilter(u64),
    Search,
}

impl Cli {
    /// Pick the action. Listing and open flags take precedence over search,
    /// in the order they are checked here.
    #[must_use]
    pub fn action(&self) -> Action {
        if let Some(shell) = self.completions {
            return Action::Completions(shell);
        }
        if let Some(key) = self.open.as_deref().filter(|key| !key.is_empty()) {
            return Action::Open(key.to_string());
        }
        if self.list_projects {
            return Action::ListProjects;
        }
        if self.list_users {
            return Action::ListUsers;
        }
        if self.list_filters {
            return Action::ListFilters;
        }
        match self.print_filter {
            Some(id) if id != 0 => Action::PrintFilter(id),
            _ => Action::Search,
        }
    }

    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config_path: self.config.clone(),
            timeout_secs: self.timeout,
            no_color: self.no_color,
        }
    }
}
