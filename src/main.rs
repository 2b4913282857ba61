use clap::Parser;
use jrquery::cli::commands;
use jrquery::cli::{Action, Cli};
use jrquery::logging::init_logging;
use jrquery::{JrqueryError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.debug) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if cli.no_color {
        colored::control::set_override(false);
    }

    let overrides = cli.overrides();

    let result = match cli.action() {
        Action::Completions(shell) => commands::completions::execute(shell),
        Action::Open(key) => commands::open::execute(&key, cli.dry_run, &overrides),
        Action::ListProjects => commands::list::projects(&cli, &overrides),
        Action::ListUsers => commands::list::users(&cli, &overrides),
        Action::ListFilters => commands::list::filters(&cli, &overrides),
        Action::PrintFilter(id) => commands::list::print_filter(id, &cli, &overrides),
        Action::Search => commands::search::execute(&cli, &overrides),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &JrqueryError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}
