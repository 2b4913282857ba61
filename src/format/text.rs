//! Text formatting functions for `jrquery`.
//!
//! Provides terminal output with optional ANSI color:
//! - Issue lines: `[KEY][STATUS][dd-mm-YYYY][Assignee](Project) Summary`
//! - Listing lines: `KEY: Name`
//! - Truncation footers

use crate::model::{CATEGORY_DONE, CATEGORY_NEW, Issue};
use colored::{ColoredString, Colorize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shown when an issue has no assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// Shown when an issue carries no usable update timestamp.
const NO_DATE: &str = "--";

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions {
    pub use_color: bool,
    pub max_width: Option<usize>,
}

impl TextFormatOptions {
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            use_color: false,
            max_width: None,
        }
    }
}

/// Column widths shared by every line of one listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueColumnWidths {
    pub key: usize,
    pub status: usize,
}

impl IssueColumnWidths {
    /// Widest key and status name among `issues`.
    #[must_use]
    pub fn measure(issues: &[Issue]) -> Self {
        issues.iter().fold(Self::default(), |widths, issue| Self {
            key: widths.key.max(visible_len(&issue.key)),
            status: widths.status.max(visible_len(issue.status_name())),
        })
    }
}

/// Determine terminal width from environment (falls back to 80).
#[must_use]
pub fn terminal_width() -> usize {
    if let Ok(columns) = std::env::var("COLUMNS") {
        if let Ok(value) = columns.trim().parse::<usize>() {
            if value > 0 {
                return value;
            }
        }
    }
    80
}

/// Truncate a title to fit within `max_len` visible columns.
///
/// Handles wide characters (emojis, CJK) correctly using `unicode-width`.
#[must_use]
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    if visible_len(title) <= max_len {
        return title.to_string();
    }

    if max_len <= 3 {
        return take_columns(title, max_len);
    }

    let mut short = take_columns(title, max_len - 3);
    short.push_str("...");
    short
}

fn take_columns(text: &str, columns: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw > columns {
            break;
        }
        width += cw;
        out.push(c);
    }
    out
}

fn visible_len(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Left-align `text` in `width` visible columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(visible_len(text));
    format!("{text}{}", " ".repeat(fill))
}

/// Key and status color for a status category key.
fn category_color(text: &str, category: &str) -> ColoredString {
    match category {
        CATEGORY_NEW => text.white().bold(),
        CATEGORY_DONE => text.green().bold(),
        _ => text.blue().bold(),
    }
}

/// Last update as `dd-mm-YYYY`.
#[must_use]
pub fn format_updated(issue: &Issue) -> String {
    issue
        .updated()
        .map_or_else(|| NO_DATE.to_string(), |ts| ts.format("%d-%m-%Y").to_string())
}

/// Format a single issue line.
///
/// Format: `[{key}][{status}][{updated}][{assignee}]({project}) {summary}`
#[must_use]
pub fn format_issue_line_with(
    issue: &Issue,
    widths: IssueColumnWidths,
    options: TextFormatOptions,
) -> String {
    let key = pad(&issue.key, widths.key);
    let status = pad(issue.status_name(), widths.status);
    let updated = format_updated(issue);
    let assignee = issue.assignee_name().unwrap_or(UNASSIGNED);
    let project = issue.project_name();

    // Brackets, parentheses and the space before the summary.
    let prefix_len = visible_len(&key)
        + visible_len(&status)
        + visible_len(&updated)
        + visible_len(assignee)
        + visible_len(project)
        + 11;

    let summary = options.max_width.map_or_else(
        || issue.summary().to_string(),
        |width| truncate_title(issue.summary(), width.saturating_sub(prefix_len)),
    );

    if !options.use_color {
        return format!("[{key}][{status}][{updated}][{assignee}]({project}) {summary}");
    }

    let category = issue.status_category();
    format!(
        "[{}][{}][{updated}][{}]({}) {}",
        category_color(&key, category),
        category_color(&status, category),
        assignee.blue(),
        project.yellow(),
        summary.as_str().white().bold(),
    )
}

/// `KEY: Name` line used by the project, user and filter listings.
#[must_use]
pub fn format_listing_line(key: &str, name: &str, use_color: bool) -> String {
    if use_color {
        format!("{}: {}", key.blue().bold(), name.yellow())
    } else {
        format!("{key}: {name}")
    }
}

/// `* Displaying first N of M <noun>` shown when output was truncated.
#[must_use]
pub fn format_truncation_footer(shown: usize, total: usize, noun: &str, use_color: bool) -> String {
    let text = format!("Displaying first {shown} of {total} {noun}");
    if use_color {
        format!("{} {}", " *".green().bold(), text.as_str().red().bold())
    } else {
        format!(" * {text}")
    }
}
