//! Error types and handling for `jrquery`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration for ad-hoc failures at the edges
//! - Keeps remote failures as a separate [`RemoteServiceError`] so the
//!   pagination engine can wrap them with the query and offset that failed
//! - Provides structured JSON output for scripted callers

mod structured;

pub use structured::{ErrorCode, StructuredError};

use thiserror::Error;

/// Failure reported by the remote Issue Search Service.
///
/// Carries the transport or service diagnostic unchanged; callers add the
/// query context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteServiceError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status code.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("could not decode service response: {0}")]
    Decode(String),
}

impl RemoteServiceError {
    /// HTTP status code, when the service answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

/// Primary error type for `jrquery` operations.
#[derive(Error, Debug)]
pub enum JrqueryError {
    // === Configuration Errors ===
    /// Credentials or base URL are missing.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Configuration file could not be read or written.
    #[error("Configuration error: {0}")]
    Config(String),

    // === Remote Errors ===
    /// A search request failed; no partial results are returned.
    #[error("Search failed for query '{query}' at offset {offset}: {source}")]
    Remote {
        query: String,
        offset: usize,
        #[source]
        source: RemoteServiceError,
    },

    /// A non-search request (projects, users, filters) failed.
    #[error("Remote service error: {0}")]
    RemoteService(#[from] RemoteServiceError),

    // === Validation Errors ===
    /// Flag validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === I/O Errors ===
    /// File system or process I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl JrqueryError {
    /// The underlying remote diagnostic, if this error came from the service.
    #[must_use]
    pub const fn remote_source(&self) -> Option<&RemoteServiceError> {
        match self {
            Self::Remote { source, .. } | Self::RemoteService(source) => Some(source),
            _ => None,
        }
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        if let Self::InvalidConfiguration { .. } = self {
            return Some(
                "Set JIRA_BASE_URL, JIRA_USER_EMAIL and JIRA_API_TOKEN, or run jrquery in a terminal to be prompted",
            );
        }
        match self.remote_source()?.status() {
            Some(401 | 403) => Some("Check your e-mail and API token"),
            Some(400) => Some("The service rejected the query; rerun with --debug to print it"),
            Some(404) => Some("Check the base URL and the requested ID"),
            _ => None,
        }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Result type using `JrqueryError`.
pub type Result<T> = std::result::Result<T, JrqueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JrqueryError::Remote {
            query: "project = 'ABC' ORDER BY key ASC".to_string(),
            offset: 50,
            source: RemoteServiceError::Status {
                status: 400,
                body: "bad jql".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Search failed for query 'project = 'ABC' ORDER BY key ASC' at offset 50: service returned HTTP 400: bad jql"
        );
    }

    #[test]
    fn test_validation_error() {
        let err = JrqueryError::validation("filter", "must be numeric");
        assert_eq!(err.to_string(), "Validation failed: filter: must be numeric");
    }

    #[test]
    fn test_suggestion_by_status() {
        let err = JrqueryError::RemoteService(RemoteServiceError::Status {
            status: 401,
            body: String::new(),
        });
        assert_eq!(err.suggestion(), Some("Check your e-mail and API token"));

        let err = JrqueryError::RemoteService(RemoteServiceError::Decode("eof".into()));
        assert_eq!(err.suggestion(), None);
    }

    #[test]
    fn test_remote_source() {
        let source = RemoteServiceError::Transport("timed out".to_string());
        let err = JrqueryError::Remote {
            query: "filter=1".to_string(),
            offset: 0,
            source: source.clone(),
        };
        assert_eq!(err.remote_source(), Some(&source));
        assert_eq!(JrqueryError::Config("x".into()).remote_source(), None);
    }
}
