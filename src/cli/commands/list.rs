//! Directory listings: projects, users, saved filters, and a single
//! filter's JQL.

use super::{connect, print_json};
use crate::cli::Cli;
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format::{ListingOutput, format_listing_line, format_truncation_footer};
use crate::model::{Listing, Project, SavedFilter, User};
use tracing::info;

/// List visible projects sorted by key.
///
/// # Errors
///
/// Returns an error if configuration is missing or the request fails.
pub fn projects(cli: &Cli, overrides: &CliOverrides) -> Result<()> {
    let (_, client) = connect(overrides)?;
    let mut listing = client.projects()?;
    info!(count = listing.items.len(), total = listing.total, "Fetched projects");

    if cli.json {
        return print_json(&ListingOutput::new(&listing));
    }
    print_lines(&render_projects(&mut listing, config::should_use_color(overrides)));
    Ok(())
}

/// List active human users sorted by display name.
///
/// # Errors
///
/// Returns an error if configuration is missing or any page fails.
pub fn users(cli: &Cli, overrides: &CliOverrides) -> Result<()> {
    let (_, client) = connect(overrides)?;
    let mut listing = client.all_users()?;
    info!(count = listing.items.len(), "Fetched users");

    listing.items.retain(User::is_active_person);
    if cli.json {
        return print_json(&ListingOutput::new(&listing));
    }
    print_lines(&render_users(&mut listing, config::should_use_color(overrides)));
    Ok(())
}

/// List saved filters sorted by name.
///
/// # Errors
///
/// Returns an error if configuration is missing or the request fails.
pub fn filters(cli: &Cli, overrides: &CliOverrides) -> Result<()> {
    let (_, client) = connect(overrides)?;
    let mut listing = client.filters()?;
    info!(count = listing.items.len(), total = listing.total, "Fetched filters");

    if cli.json {
        return print_json(&ListingOutput::new(&listing));
    }
    print_lines(&render_filters(&mut listing, config::should_use_color(overrides)));
    Ok(())
}

/// Print the JQL of saved filter `id`.
///
/// # Errors
///
/// Returns an error if configuration is missing or the filter cannot be read.
pub fn print_filter(id: u64, cli: &Cli, overrides: &CliOverrides) -> Result<()> {
    let (_, client) = connect(overrides)?;
    let filter = client.filter(id)?;

    if cli.json {
        return print_json(&filter);
    }
    println!("{}", filter.jql);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// One line per item, or `No <noun> found.`, plus the footer when the
/// remote side reported more records than it returned.
fn render_listing<T>(
    items: &[T],
    line: impl Fn(&T) -> String,
    noun: &str,
    truncation: Option<(usize, usize)>,
    use_color: bool,
) -> Vec<String> {
    if items.is_empty() {
        return vec![format!("No {noun} found.")];
    }

    let mut lines: Vec<String> = items.iter().map(line).collect();
    if let Some((shown, total)) = truncation {
        lines.push(format_truncation_footer(shown, total, noun, use_color));
    }
    lines
}

fn truncation<T>(listing: &Listing<T>) -> Option<(usize, usize)> {
    listing
        .is_truncated()
        .then_some((listing.items.len(), listing.total))
}

fn render_projects(listing: &mut Listing<Project>, use_color: bool) -> Vec<String> {
    listing.items.sort_by(|a, b| a.key.cmp(&b.key));
    render_listing(
        &listing.items,
        |project| format_listing_line(&project.key, &project.name, use_color),
        "projects",
        truncation(listing),
        use_color,
    )
}

/// Every page has already been fetched, so no footer.
fn render_users(listing: &mut Listing<User>, use_color: bool) -> Vec<String> {
    listing
        .items
        .sort_by(|a, b| a.display_name.cmp(&b.display_name));
    render_listing(
        &listing.items,
        |user| {
            format_listing_line(
                user.email_address.as_deref().unwrap_or_default(),
                &user.display_name,
                use_color,
            )
        },
        "users",
        None,
        use_color,
    )
}

fn render_filters(listing: &mut Listing<SavedFilter>, use_color: bool) -> Vec<String> {
    listing.items.sort_by(|a, b| a.name.cmp(&b.name));
    render_listing(
        &listing.items,
        |filter| format_listing_line(&filter.id, &filter.name, use_color),
        "filters",
        truncation(listing),
        use_color,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(key: &str, name: &str) -> Project {
        Project {
            key: key.to_string(),
            name: name.to_string(),
        }
    }

    fn user(name: &str, email: Option<&str>) -> User {
        User {
            account_id: name.to_lowercase(),
            account_type: "atlassian".to_string(),
            display_name: name.to_string(),
            email_address: email.map(str::to_string),
            active: true,
        }
    }

    #[test]
    fn test_projects_sorted_by_key() {
        let mut listing = Listing::new(
            vec![project("WEB", "Website"), project("OPS", "Operations")],
            50,
            2,
        );
        assert_eq!(
            render_projects(&mut listing, false),
            vec!["OPS: Operations", "WEB: Website"]
        );
    }

    #[test]
    fn test_projects_footer_when_truncated() {
        let mut listing = Listing::new(vec![project("OPS", "Operations")], 1, 7);
        let lines = render_projects(&mut listing, false);
        assert_eq!(lines.last().map(String::as_str), Some(" * Displaying first 1 of 7 projects"));
    }

    #[test]
    fn test_projects_footer_counts_returned_items() {
        let mut listing = Listing::new(vec![project("OPS", "Operations")], 50, 80);
        let lines = render_projects(&mut listing, false);
        assert_eq!(lines.last().map(String::as_str), Some(" * Displaying first 1 of 80 projects"));

        let mut complete = Listing::new(vec![project("OPS", "Operations")], 50, 1);
        assert_eq!(render_projects(&mut complete, false), vec!["OPS: Operations"]);
    }

    #[test]
    fn test_users_sorted_by_name_without_footer() {
        let mut listing = Listing::new(
            vec![user("Zoe", Some("zoe@example.com")), user("Ana", None)],
            1000,
            2500,
        );
        assert_eq!(
            render_users(&mut listing, false),
            vec![": Ana", "zoe@example.com: Zoe"]
        );
        assert_eq!(listing.items.len(), 2);
    }

    #[test]
    fn test_filters_sorted_by_name() {
        let mut listing = Listing::new(
            vec![
                SavedFilter {
                    id: "2".to_string(),
                    name: "Triage".to_string(),
                    jql: String::new(),
                },
                SavedFilter {
                    id: "10".to_string(),
                    name: "Backlog".to_string(),
                    jql: String::new(),
                },
            ],
            50,
            2,
        );
        assert_eq!(
            render_filters(&mut listing, false),
            vec!["10: Backlog", "2: Triage"]
        );
    }

    #[test]
    fn test_empty_listings() {
        let mut empty: Listing<Project> = Listing::new(Vec::new(), 50, 0);
        assert_eq!(render_projects(&mut empty, false), vec!["No projects found."]);
    }
}
