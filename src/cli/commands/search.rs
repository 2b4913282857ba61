//! Search command implementation.
//!
//! Builds JQL from the flags (or uses a saved filter), fetches issues and
//! prints them as text, JSON or a bare count.

use super::{connect, print_json, text_options};
use crate::cli::Cli;
use crate::client::filter_query;
use crate::config::{self, CliOverrides};
use crate::error::{JrqueryError, Result};
use crate::format::{
    CountOutput, IssueColumnWidths, SearchOutput, TextFormatOptions, format_issue_line_with,
    format_truncation_footer,
};
use crate::model::SearchResult;
use crate::query::{FilterOptions, build_query};
use tracing::info;

/// Execute the search command.
///
/// # Errors
///
/// Returns an error if the filter ID is not numeric, configuration is
/// missing, or the remote search fails.
pub fn execute(cli: &Cli, overrides: &CliOverrides) -> Result<()> {
    if let Some(id) = cli.filter.as_deref() {
        validate_filter_id(id)?;
    }

    if cli.dry_run {
        let layer = config::load_layer(overrides)?;
        let options = build_options(cli, layer.user_email.as_deref());
        println!("{}", query_for(cli, &options));
        return Ok(());
    }

    let (config, client) = connect(overrides)?;
    let options = build_options(cli, Some(&config.user_email));
    let jql = query_for(cli, &options);

    if cli.debug {
        println!("Searching issues for JQL: {jql}");
    }
    info!(jql = %jql, limit = cli.limit, "Searching issues");

    let result = match cli.filter.as_deref() {
        Some(id) => client.search_by_filter(id, cli.limit)?,
        None => client.search_bounded(&jql, cli.limit)?,
    };
    info!(
        fetched = result.count(),
        total = result.total,
        "Search finished"
    );

    if cli.count {
        if cli.json {
            return print_json(&CountOutput {
                count: result.count(),
            });
        }
        println!("{}", result.count());
        return Ok(());
    }

    if cli.json {
        return print_json(&SearchOutput::new(&jql, &result));
    }

    for line in render_text(&result, text_options(overrides)) {
        println!("{line}");
    }
    Ok(())
}

/// Map flags onto query options, resolving `me` to `user_email`.
///
/// Empty string values count as unset.
#[must_use]
pub fn build_options(cli: &Cli, user_email: Option<&str>) -> FilterOptions {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
    let user = non_empty(&cli.user);

    FilterOptions {
        project: non_empty(&cli.project),
        search_terms: cli.terms.clone(),
        search_scope: cli.search,
        assignee: config::resolve_assignee(user.as_deref(), user_email),
        only_active_sprint: cli.sprint,
        only_unresolved: cli.unresolved,
        status: non_empty(&cli.status),
        custom_query: non_empty(&cli.query),
        order_by_time_level: cli.order_by_time,
    }
}

/// The query actually sent: the saved filter reference, or built JQL.
fn query_for(cli: &Cli, options: &FilterOptions) -> String {
    cli.filter
        .as_deref()
        .map_or_else(|| build_query(options), filter_query)
}

fn validate_filter_id(id: &str) -> Result<()> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(JrqueryError::validation(
            "filter",
            format!("saved filter ID must be numeric, got '{id}'"),
        ));
    }
    Ok(())
}

/// Text lines for a search result, footer included.
#[must_use]
pub fn render_text(result: &SearchResult, options: TextFormatOptions) -> Vec<String> {
    if result.is_empty() {
        return vec!["No results found.".to_string()];
    }

    let widths = IssueColumnWidths::measure(&result.issues);
    let mut lines: Vec<String> = result
        .issues
        .iter()
        .map(|issue| format_issue_line_with(issue, widths, options))
        .collect();

    if result.is_truncated() {
        lines.push(format_truncation_footer(
            result.count(),
            result.total,
            "results",
            options.use_color,
        ));
    }
    lines
}
