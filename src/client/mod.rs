//! Issue search client and pagination engine.
//!
//! [`IssueClient`] drives a remote [`IssueSearchService`] strictly
//! sequentially: one request in flight, results accumulated in locals, and
//! any failure returned immediately with no partial result. Nothing is
//! retried.
//!
//! The bounded and saved-filter searches share one loop,
//! [`IssueClient::paginate`], parameterized by a [`PageStrategy`].

mod http;

pub use http::HttpSearchService;

use crate::error::{JrqueryError, RemoteServiceError, Result};
use crate::model::{Listing, Project, SavedFilter, SearchResult, User};
use tracing::{debug, trace};

/// Page size for bounded JQL searches.
pub const BOUNDED_PAGE_SIZE: usize = 50;
/// Page size for saved-filter searches; filter results are already scoped.
pub const FILTER_PAGE_SIZE: usize = 100;
/// Page size for the user directory listing.
pub const USER_PAGE_SIZE: usize = 1000;

/// The remote search operation.
pub trait IssueSearchService {
    /// Run `query` and return the page starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns the transport or service diagnostic unchanged.
    fn search(
        &self,
        query: &str,
        offset: usize,
        page_size: usize,
    ) -> std::result::Result<SearchResult, RemoteServiceError>;
}

/// Remote listing operations used by the secondary commands.
pub trait Directory {
    /// The authenticated user.
    ///
    /// # Errors
    ///
    /// Returns the transport or service diagnostic unchanged.
    fn current_user(&self) -> std::result::Result<User, RemoteServiceError>;

    /// Projects visible to the authenticated user (first page).
    ///
    /// # Errors
    ///
    /// Returns the transport or service diagnostic unchanged.
    fn projects(&self) -> std::result::Result<Listing<Project>, RemoteServiceError>;

    /// One page of the user directory.
    ///
    /// # Errors
    ///
    /// Returns the transport or service diagnostic unchanged.
    fn users_page(
        &self,
        offset: usize,
        page_size: usize,
    ) -> std::result::Result<Vec<User>, RemoteServiceError>;

    /// Saved filters visible to the authenticated user (first page).
    ///
    /// # Errors
    ///
    /// Returns the transport or service diagnostic unchanged.
    fn filters(&self) -> std::result::Result<Listing<SavedFilter>, RemoteServiceError>;

    /// A single saved filter, including its JQL.
    ///
    /// # Errors
    ///
    /// Returns the transport or service diagnostic unchanged.
    fn filter(&self, id: u64) -> std::result::Result<SavedFilter, RemoteServiceError>;
}

impl<T: IssueSearchService + ?Sized> IssueSearchService for &T {
    fn search(
        &self,
        query: &str,
        offset: usize,
        page_size: usize,
    ) -> std::result::Result<SearchResult, RemoteServiceError> {
        (**self).search(query, offset, page_size)
    }
}

/// When the pagination loop stops, besides reaching the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    /// A page shorter than the page size signals exhaustion.
    ShortPage,
    /// Stop once the accumulated count reaches the remote total.
    RemoteTotal,
}

/// Which number is reported as `SearchResult::total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalPolicy {
    /// The remote total from the last successful page.
    Remote,
    /// The number of issues actually accumulated.
    Accumulated,
}

/// Parameters that distinguish the paginated search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageStrategy {
    pub page_size: usize,
    /// Trim each page so the accumulated count never exceeds the ceiling.
    pub truncate_to_ceiling: bool,
    pub stop: StopRule,
    pub total: TotalPolicy,
}

impl PageStrategy {
    /// Bounded JQL search: pages of 50, trimmed to the ceiling.
    pub const BOUNDED: Self = Self {
        page_size: BOUNDED_PAGE_SIZE,
        truncate_to_ceiling: true,
        stop: StopRule::ShortPage,
        total: TotalPolicy::Remote,
    };

    /// Saved-filter search: pages of 100, whole pages kept, and `total`
    /// reports what was fetched rather than what the service matched.
    pub const SAVED_FILTER: Self = Self {
        page_size: FILTER_PAGE_SIZE,
        truncate_to_ceiling: false,
        stop: StopRule::RemoteTotal,
        total: TotalPolicy::Accumulated,
    };
}

/// JQL that selects the issues of a saved filter.
#[must_use]
pub fn filter_query(filter_id: &str) -> String {
    format!("filter={filter_id}")
}

/// Search client over a remote service.
#[derive(Debug, Clone)]
pub struct IssueClient<S> {
    service: S,
}

impl<S> IssueClient<S> {
    #[must_use]
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }
}

impl<S: IssueSearchService> IssueClient<S> {
    /// Single round trip, no looping.
    ///
    /// # Errors
    ///
    /// Returns [`JrqueryError::Remote`] carrying `query` and `offset`.
    pub fn search_page(&self, query: &str, offset: usize, page_size: usize) -> Result<SearchResult> {
        trace!(query, offset, page_size, "Requesting page");
        self.service
            .search(query, offset, page_size)
            .map_err(|source| JrqueryError::Remote {
                query: query.to_string(),
                offset,
                source,
            })
    }

    /// Fetch at most `max_results` issues matching `query`, 50 per request.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error; no partial result.
    pub fn search_bounded(&self, query: &str, max_results: usize) -> Result<SearchResult> {
        self.paginate(query, max_results, PageStrategy::BOUNDED)
    }

    /// Fetch the issues of saved filter `filter_id`, 100 per request, until
    /// `limit` or the remote total is reached.
    ///
    /// Whole pages are kept, so the result can exceed `limit` by up to one
    /// page. The returned `total` is the fetched count, not the remote total.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error; no partial result.
    pub fn search_by_filter(&self, filter_id: &str, limit: usize) -> Result<SearchResult> {
        self.paginate(&filter_query(filter_id), limit, PageStrategy::SAVED_FILTER)
    }

    /// The shared pagination loop.
    ///
    /// At least one request is always made, even for a zero ceiling, so the
    /// remote total is known. The offset advances by the page size whatever
    /// was kept from the page.
    ///
    /// # Errors
    ///
    /// Returns the first failing page's error; accumulated issues are dropped.
    pub fn paginate(
        &self,
        query: &str,
        ceiling: usize,
        strategy: PageStrategy,
    ) -> Result<SearchResult> {
        let mut issues = Vec::new();
        let mut offset = 0;

        let (remote_total, page_max_results) = loop {
            let page = self.search_page(query, offset, strategy.page_size)?;
            let returned = page.issues.len();
            let remote_total = page.total;
            let page_max_results = page.max_results;

            let mut kept = page.issues;
            if strategy.truncate_to_ceiling {
                kept.truncate(ceiling.saturating_sub(issues.len()));
            }
            issues.extend(kept);

            debug!(
                offset,
                returned,
                accumulated = issues.len(),
                remote_total,
                "Fetched page"
            );

            if issues.len() >= ceiling {
                break (remote_total, page_max_results);
            }

            let exhausted = match strategy.stop {
                StopRule::ShortPage => returned < strategy.page_size,
                // An empty page also ends the loop in case the service
                // over-reports its total.
                StopRule::RemoteTotal => issues.len() >= remote_total || returned == 0,
            };
            if exhausted {
                break (remote_total, page_max_results);
            }

            offset += strategy.page_size;
        };

        let total = match strategy.total {
            TotalPolicy::Remote => remote_total,
            TotalPolicy::Accumulated => issues.len(),
        };

        Ok(SearchResult::new(issues, page_max_results, total))
    }
}

impl<S: Directory> IssueClient<S> {
    /// # Errors
    ///
    /// Returns [`JrqueryError::RemoteService`] on any failure.
    pub fn current_user(&self) -> Result<User> {
        Ok(self.service.current_user()?)
    }

    /// # Errors
    ///
    /// Returns [`JrqueryError::RemoteService`] on any failure.
    pub fn projects(&self) -> Result<Listing<Project>> {
        Ok(self.service.projects()?)
    }

    /// # Errors
    ///
    /// Returns [`JrqueryError::RemoteService`] on any failure.
    pub fn filters(&self) -> Result<Listing<SavedFilter>> {
        Ok(self.service.filters()?)
    }

    /// # Errors
    ///
    /// Returns [`JrqueryError::RemoteService`] on any failure.
    pub fn filter(&self, id: u64) -> Result<SavedFilter> {
        Ok(self.service.filter(id)?)
    }

    /// Every user in the directory, 1000 per request until a short page.
    ///
    /// # Errors
    ///
    /// Returns [`JrqueryError::RemoteService`] on the first failing page.
    pub fn all_users(&self) -> Result<Listing<User>> {
        let mut users = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.service.users_page(offset, USER_PAGE_SIZE)?;
            let returned = page.len();
            users.extend(page);
            debug!(offset, returned, accumulated = users.len(), "Fetched user page");

            if returned < USER_PAGE_SIZE {
                break;
            }
            offset += USER_PAGE_SIZE;
        }

        let total = users.len();
        Ok(Listing::new(users, USER_PAGE_SIZE, total))
    }
}
