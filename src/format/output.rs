use crate::model::{Issue, Listing, SearchResult};
use serde::Serialize;

/// `--count --json` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountOutput {
    pub count: usize,
}

/// Search results for `--json`, with the query that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput<'a> {
    pub jql: &'a str,
    pub issues: &'a [Issue],
    pub max_results: usize,
    pub total: usize,
    pub truncated: bool,
}

impl<'a> SearchOutput<'a> {
    #[must_use]
    pub fn new(jql: &'a str, result: &'a SearchResult) -> Self {
        Self {
            jql,
            issues: &result.issues,
            max_results: result.max_results,
            total: result.total,
            truncated: result.is_truncated(),
        }
    }
}

/// Listing records for `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct ListingOutput<'a, T> {
    pub items: &'a [T],
    pub max_results: usize,
    pub total: usize,
}

impl<'a, T> ListingOutput<'a, T> {
    #[must_use]
    pub fn new(listing: &'a Listing<T>) -> Self {
        Self {
            items: &listing.items,
            max_results: listing.max_results,
            total: listing.total,
        }
    }
}
