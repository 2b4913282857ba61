//! Output formatting for `jrquery`.
//!
//! Supports human-readable text output and machine-parseable JSON.
//! Results go to stdout; diagnostics and errors go to stderr.

mod output;
mod text;

pub use output::{CountOutput, ListingOutput, SearchOutput};
pub use text::{
    IssueColumnWidths, TextFormatOptions, UNASSIGNED, format_issue_line_with,
    format_listing_line, format_truncation_footer, format_updated, terminal_width, truncate_title,
};
