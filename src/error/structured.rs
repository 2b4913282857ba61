//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging

use crate::error::{JrqueryError, RemoteServiceError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Remote Errors (exit code 2) ===
    /// Service could not be reached
    TransportError,
    /// Service rejected credentials
    Unauthorized,
    /// Service rejected the request
    RemoteServiceError,
    /// Service response could not be decoded
    DecodeError,

    // === Validation Errors (exit code 4) ===
    /// Flag validation failed
    ValidationFailed,

    // === Config Errors (exit code 7) ===
    /// Required configuration missing
    InvalidConfiguration,
    /// Config file could not be read or written
    ConfigError,

    // === I/O Errors (exit code 8) ===
    /// File or process I/O error
    IoError,
    /// JSON serialization error
    JsonError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TransportError => "TRANSPORT_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::RemoteServiceError => "REMOTE_SERVICE_ERROR",
            Self::DecodeError => "DECODE_ERROR",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidConfiguration => "INVALID_CONFIGURATION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether rerunning the same command might succeed.
    ///
    /// The client itself never retries; this only informs the caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportError | Self::ValidationFailed)
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: Remote service errors
    /// - 4: Validation errors
    /// - 7: Config errors
    /// - 8: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::TransportError
            | Self::Unauthorized
            | Self::RemoteServiceError
            | Self::DecodeError => 2,
            Self::ValidationFailed => 4,
            Self::InvalidConfiguration | Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether the operation can be retried
    pub retryable: bool,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `JrqueryError`.
    #[must_use]
    pub fn from_error(err: &JrqueryError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);

        Self {
            code,
            message: err.to_string(),
            hint: err.suggestion().map(str::to_string),
            retryable: code.is_retryable(),
            context,
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &JrqueryError) -> (ErrorCode, Option<Value>) {
        match err {
            JrqueryError::InvalidConfiguration { reason } => (
                ErrorCode::InvalidConfiguration,
                Some(json!({"reason": reason})),
            ),
            JrqueryError::Config(_) => (ErrorCode::ConfigError, None),
            JrqueryError::Remote {
                query,
                offset,
                source,
            } => {
                let mut context = json!({"query": query, "offset": offset});
                if let Some(status) = source.status() {
                    context["status"] = json!(status);
                }
                (remote_code(source), Some(context))
            }
            JrqueryError::RemoteService(source) => (
                remote_code(source),
                source.status().map(|status| json!({"status": status})),
            ),
            JrqueryError::Validation { field, reason } => (
                ErrorCode::ValidationFailed,
                Some(json!({"field": field, "reason": reason})),
            ),
            JrqueryError::Io(_) => (ErrorCode::IoError, None),
            JrqueryError::Json(_) => (ErrorCode::JsonError, None),
            JrqueryError::Other(_) => (ErrorCode::InternalError, None),
        }
    }
}

fn remote_code(source: &RemoteServiceError) -> ErrorCode {
    match source {
        RemoteServiceError::Transport(_) => ErrorCode::TransportError,
        RemoteServiceError::Decode(_) => ErrorCode::DecodeError,
        RemoteServiceError::Status {
            status: 401 | 403, ..
        } => ErrorCode::Unauthorized,
        RemoteServiceError::Status { .. } => ErrorCode::RemoteServiceError,
    }
}
