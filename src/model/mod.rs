//! Core data types for `jrquery`.
//!
//! These mirror the remote service's JSON closely enough to be passed
//! through to `--json` output unchanged:
//! - `Issue` - an issue as returned by a search
//! - `SearchResult` - accumulated issues plus the service's paging numbers
//! - `Project`, `User`, `SavedFilter` - records for the listing commands
//! - `Listing` - a page of listing records with its reported totals

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Status category key the service uses for not-yet-started issues.
pub const CATEGORY_NEW: &str = "new";
/// Status category key the service uses for finished issues.
pub const CATEGORY_DONE: &str = "done";

/// An issue returned by the search endpoint.
///
/// Only the fields consumed by the display layer are typed; everything else
/// the service sends is kept in `extra` so JSON output stays a passthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub assignee: Option<UserRef>,
    #[serde(default)]
    pub project: ProjectRef,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IssueStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status_category: StatusCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatusCategory {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectRef {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
}

impl Issue {
    /// Convenience constructor used by fakes and tests.
    #[must_use]
    pub fn new(key: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: IssueFields {
                summary: summary.into(),
                ..IssueFields::default()
            },
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn status_name(&self) -> &str {
        &self.fields.status.name
    }

    #[must_use]
    pub fn status_category(&self) -> &str {
        &self.fields.status.status_category.key
    }

    #[must_use]
    pub fn assignee_name(&self) -> Option<&str> {
        self.fields
            .assignee
            .as_ref()
            .map(|assignee| assignee.display_name.as_str())
    }

    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.fields.project.name
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    #[must_use]
    pub const fn updated(&self) -> Option<&DateTime<FixedOffset>> {
        self.fields.updated.as_ref()
    }
}

/// Issues fetched by one search invocation.
///
/// `max_results` is the page size the service reported for the last request
/// made. `total` is the service's full match count, except for saved-filter
/// searches, which report the number of issues actually fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResult {
    pub issues: Vec<Issue>,
    pub max_results: usize,
    pub total: usize,
}

impl SearchResult {
    #[must_use]
    pub const fn new(issues: Vec<Issue>, max_results: usize, total: usize) -> Self {
        Self {
            issues,
            max_results,
            total,
        }
    }

    /// Number of issues held.
    #[must_use]
    pub fn count(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// True when the service matched more issues than were fetched.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.total > self.issues.len()
    }
}

/// A visible project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Project {
    pub key: String,
    #[serde(default)]
    pub name: String,
}

/// A user account known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl User {
    /// Human accounts (not apps or customers) that can still log in.
    #[must_use]
    pub fn is_active_person(&self) -> bool {
        self.active && self.account_type == "atlassian"
    }
}

/// A saved, server-side query referenced by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SavedFilter {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub jql: String,
}

/// A page of listing records with the totals the service reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub max_results: usize,
    pub total: usize,
}

impl<T> Listing<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, max_results: usize, total: usize) -> Self {
        Self {
            items,
            max_results,
            total,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when the service has more records than it returned.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.total > self.items.len()
    }
}

/// Parse a service timestamp.
///
/// The service emits `2024-03-01T10:20:30.000+0100`, which is not RFC 3339
/// (no colon in the offset). Both forms are accepted.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

/// Unparseable timestamps become `None` rather than failing the whole page.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}
