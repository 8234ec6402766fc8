//! Error types and exit codes for shelfdex
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (store unavailable, container unreadable, ...)
//! - 2: Usage error (bad flags/args, invalid input)
//! - 3: Data error (requested entity not found)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - entity not found (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for ShelfdexError {
    fn from(err: rusqlite::Error) -> Self {
        ShelfdexError::Store(err.to_string())
    }
}

/// Errors that can occur during shelfdex operations
#[derive(Error, Debug)]
pub enum ShelfdexError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("store error: {0}")]
    Store(String),

    #[error("unreadable index container {path:?}: {reason}")]
    Container { path: PathBuf, reason: String },

    #[error("library root not found: {0:?}")]
    LibraryNotFound(PathBuf),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),

    #[error("ingest interrupted; batches committed so far are kept")]
    Interrupted,
}

impl ShelfdexError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        ShelfdexError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed transaction operation
    pub fn transaction(operation: &str, error: impl std::fmt::Display) -> Self {
        ShelfdexError::FailedOperation {
            operation: format!("{} transaction", operation),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        ShelfdexError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an unreadable index container
    pub fn container(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        ShelfdexError::Container {
            path: path.into(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        ShelfdexError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        ShelfdexError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ShelfdexError::NotFound { .. })
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ShelfdexError::UnknownFormat(_)
            | ShelfdexError::UsageError(_)
            | ShelfdexError::InvalidValue { .. } => ExitCode::Usage,

            ShelfdexError::NotFound { .. } | ShelfdexError::LibraryNotFound(_) => ExitCode::Data,

            ShelfdexError::Io(_)
            | ShelfdexError::Json(_)
            | ShelfdexError::Toml(_)
            | ShelfdexError::Store(_)
            | ShelfdexError::Container { .. }
            | ShelfdexError::FailedOperation { .. }
            | ShelfdexError::FailedOperationWithTarget { .. }
            | ShelfdexError::Other(_)
            | ShelfdexError::Interrupted => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            ShelfdexError::UnknownFormat(_) => "unknown_format",
            ShelfdexError::UsageError(_) => "usage_error",
            ShelfdexError::InvalidValue { .. } => "invalid_value",
            ShelfdexError::NotFound { .. } => "not_found",
            ShelfdexError::Io(_) => "io_error",
            ShelfdexError::Json(_) => "json_error",
            ShelfdexError::Toml(_) => "toml_error",
            ShelfdexError::Store(_) => "store_error",
            ShelfdexError::Container { .. } => "container_error",
            ShelfdexError::LibraryNotFound(_) => "library_not_found",
            ShelfdexError::FailedOperation { .. } => "failed_operation",
            ShelfdexError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            ShelfdexError::Other(_) => "other",
            ShelfdexError::Interrupted => "interrupted",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for shelfdex operations
pub type Result<T> = std::result::Result<T, ShelfdexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct_from_store_failure() {
        let missing = ShelfdexError::not_found("book", 42);
        let store: ShelfdexError = rusqlite::Error::InvalidQuery.into();

        assert!(missing.is_not_found());
        assert!(!store.is_not_found());
        assert_eq!(missing.exit_code(), ExitCode::Data);
        assert_eq!(store.exit_code(), ExitCode::Failure);
    }

    #[test]
    fn test_invalid_value_is_usage_error() {
        let err = ShelfdexError::invalid_value("limit", 0);
        assert_eq!(err.exit_code(), ExitCode::Usage);
        assert_eq!(err.to_string(), "invalid limit: 0");
    }

    #[test]
    fn test_json_envelope() {
        let json = ShelfdexError::not_found("author", 7).to_json();
        assert_eq!(json["error"]["code"], 3);
        assert_eq!(json["error"]["type"], "not_found");
        assert_eq!(json["error"]["message"], "author not found: 7");
    }
}
