//! JQL construction from search flags.
//!
//! [`build_query`] is a total function: it never validates or escapes its
//! input. A term containing a quote produces a malformed query, which the
//! remote service rejects later.

/// Numeric status category the service assigns to "done".
pub const DONE_STATUS_CATEGORY: u8 = 3;

/// Fields searched for free text, in the order each extra `-s` adds them.
const SEARCH_FIELDS: [&str; 3] = ["summary", "description", "comment"];

/// Clauses used when no filter flag was given: the caller's open issues.
const DEFAULT_CLAUSES: [&str; 2] = ["assignee = currentUser()", "statusCategory != 3"];

/// Structured search options collected from the command line.
///
/// `assignee` must already be resolved: the literal `"me"` is replaced by
/// the caller with the configured user before building.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct FilterOptions {
    pub project: Option<String>,
    pub search_terms: Vec<String>,
    /// How many of summary, description and comments to search (0-3).
    pub search_scope: u8,
    pub assignee: Option<String>,
    pub only_active_sprint: bool,
    pub only_unresolved: bool,
    pub status: Option<String>,
    /// Raw JQL that bypasses every other field.
    pub custom_query: Option<String>,
    /// 0 = key ascending, 1 = updated descending, 2 = updated ascending.
    pub order_by_time_level: u8,
}

/// Result ordering selected by the `-T` flag count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    KeyAsc,
    UpdatedDesc,
    UpdatedAsc,
}

impl OrderBy {
    /// Map a flag count to an ordering; unknown levels fall back to key order.
    #[must_use]
    pub const fn from_level(level: u8) -> Self {
        match level {
            1 => Self::UpdatedDesc,
            2 => Self::UpdatedAsc,
            _ => Self::KeyAsc,
        }
    }

    #[must_use]
    pub const fn as_clause(self) -> &'static str {
        match self {
            Self::KeyAsc => "ORDER BY key ASC",
            Self::UpdatedDesc => "ORDER BY updated DESC",
            Self::UpdatedAsc => "ORDER BY updated ASC",
        }
    }
}

/// Build the JQL for a set of options.
///
/// Clause order is fixed (project, text search, assignee, sprint,
/// unresolved, status) so output stays byte-for-byte reproducible.
#[must_use]
pub fn build_query(options: &FilterOptions) -> String {
    if let Some(custom) = options.custom_query.as_deref() {
        if !custom.is_empty() {
            return custom.to_string();
        }
    }

    let mut clauses: Vec<String> = Vec::new();

    if let Some(project) = &options.project {
        clauses.push(format!("project = '{project}'"));
    }

    if options.search_scope > 0 {
        clauses.push(text_search_clause(
            &options.search_terms,
            options.search_scope,
        ));
    }

    if let Some(assignee) = &options.assignee {
        clauses.push(format!("assignee = '{assignee}'"));
    }

    if options.only_active_sprint {
        clauses.push("Sprint in openSprints()".to_string());
    }

    if options.only_unresolved {
        clauses.push(format!("statusCategory != {DONE_STATUS_CATEGORY}"));
    }

    if let Some(status) = &options.status {
        clauses.push(format!("status = '{status}'"));
    }

    if clauses.is_empty() {
        clauses.extend(DEFAULT_CLAUSES.iter().map(|clause| (*clause).to_string()));
    }

    format!(
        "{} {}",
        clauses.join(" AND "),
        OrderBy::from_level(options.order_by_time_level).as_clause()
    )
}

/// `((summary ~ 'a' AND summary ~ 'b') OR (description ~ 'a' AND ...))`
fn text_search_clause(terms: &[String], scope: u8) -> String {
    let groups: Vec<String> = SEARCH_FIELDS
        .iter()
        .take(usize::from(scope))
        .map(|field| {
            terms
                .iter()
                .map(|term| format!("{field} ~ '{term}'"))
                .collect::<Vec<_>>()
                .join(" AND ")
        })
        .collect();

    format!("(({}))", groups.join(") OR ("))
}
