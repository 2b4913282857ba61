//! Blocking REST transport for the remote issue tracker.

use super::{Directory, IssueSearchService};
use crate::config::Config;
use crate::error::{JrqueryError, RemoteServiceError, Result};
use crate::model::{Issue, Listing, Project, SavedFilter, SearchResult, User};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Fields requested from the search endpoint; enough for the display layer.
const SEARCH_FIELDS: &str = "summary,status,assignee,project,updated";

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 300;

/// Issue Search Service backed by the REST API (v2), using basic auth.
#[derive(Debug, Clone)]
pub struct HttpSearchService {
    http: Client,
    base_url: String,
    user_email: String,
    api_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    max_results: usize,
    #[serde(default)]
    total: usize,
    #[serde(default)]
    issues: Vec<Issue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedValues<T> {
    #[serde(default)]
    max_results: usize,
    #[serde(default)]
    total: usize,
    #[serde(default = "Vec::new")]
    values: Vec<T>,
}

impl<T> From<PagedValues<T>> for Listing<T> {
    fn from(page: PagedValues<T>) -> Self {
        Self::new(page.values, page.max_results, page.total)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
}

impl HttpSearchService {
    /// Build a client from an explicit configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`JrqueryError::InvalidConfiguration`] when credentials are
    /// missing, or a transport error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("jrquery/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| JrqueryError::RemoteService(RemoteServiceError::Transport(err.to_string())))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_email: config.user_email.clone(),
            api_token: config.api_token.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> std::result::Result<T, RemoteServiceError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, ?params, "GET");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.user_email, Some(&self.api_token))
            .header(ACCEPT, "application/json")
            .query(params)
            .send()
            .map_err(|err| RemoteServiceError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|err| {
                debug!(status = status.as_u16(), error = %err, "Could not read error body");
                String::new()
            });
            return Err(RemoteServiceError::Status {
                status: status.as_u16(),
                body: summarize_error_body(&body),
            });
        }

        response
            .json::<T>()
            .map_err(|err| RemoteServiceError::Decode(err.to_string()))
    }
}

impl IssueSearchService for HttpSearchService {
    fn search(
        &self,
        query: &str,
        offset: usize,
        page_size: usize,
    ) -> std::result::Result<SearchResult, RemoteServiceError> {
        let response: SearchResponse = self.get(
            "/rest/api/2/search",
            &[
                ("jql", query.to_string()),
                ("startAt", offset.to_string()),
                ("maxResults", page_size.to_string()),
                ("fields", SEARCH_FIELDS.to_string()),
            ],
        )?;
        Ok(SearchResult::new(
            response.issues,
            response.max_results,
            response.total,
        ))
    }
}

impl Directory for HttpSearchService {
    fn current_user(&self) -> std::result::Result<User, RemoteServiceError> {
        self.get("/rest/api/2/myself", &[])
    }

    fn projects(&self) -> std::result::Result<Listing<Project>, RemoteServiceError> {
        let page: PagedValues<Project> = self.get("/rest/api/2/project/search", &[])?;
        Ok(page.into())
    }

    fn users_page(
        &self,
        offset: usize,
        page_size: usize,
    ) -> std::result::Result<Vec<User>, RemoteServiceError> {
        self.get(
            "/rest/api/2/users",
            &[
                ("startAt", offset.to_string()),
                ("maxResults", page_size.to_string()),
            ],
        )
    }

    fn filters(&self) -> std::result::Result<Listing<SavedFilter>, RemoteServiceError> {
        let page: PagedValues<SavedFilter> = self.get(
            "/rest/api/2/filter/search",
            &[("expand", "jql".to_string())],
        )?;
        Ok(page.into())
    }

    fn filter(&self, id: u64) -> std::result::Result<SavedFilter, RemoteServiceError> {
        self.get(&format!("/rest/api/2/filter/{id}"), &[])
    }
}

/// Prefer the service's `errorMessages`; otherwise a trimmed raw body.
fn summarize_error_body(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.error_messages.is_empty() {
            return parsed.error_messages.join("; ");
        }
    }

    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY {
        return trimmed.to_string();
    }
    let mut short: String = trimmed.chars().take(MAX_ERROR_BODY).collect();
    short.push_str("...");
    short
}
