//! Error types for media-catalog
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (catalog storage, filesystem, network)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for media-catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for media-catalog
///
/// Each variant carries enough context to tell the caller which part of a
/// reconciliation, deletion or download failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "data_dir")
        key: Option<String>,
    },

    /// Catalog store operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Unknown catalog entry or task id
    #[error("not found: {0}")]
    NotFound(String),

    /// Filesystem object missing, unreadable or not removable
    #[error("filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Network error (feed, episode or artwork fetch, including timeouts)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Feed could not be fetched successfully or parsed
    #[error("feed error: {0}")]
    Feed(String),

    /// Refresh requested on a category with no refresh policy
    #[error("unsupported category: {0}")]
    UnsupportedCategory(String),

    /// Caller supplied an unusable argument (e.g. a malformed feed URL)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Constraint violation (e.g., duplicate path)
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Filesystem errors raised while reconciling or deleting
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// The path does not exist on disk
    #[error("{path} does not exist")]
    Missing {
        /// The path that was expected to exist
        path: PathBuf,
    },

    /// Directory still holds objects the catalog does not know about
    #[error("directory {path} is not empty")]
    DirectoryNotEmpty {
        /// The directory that could not be removed
        path: PathBuf,
    },

    /// Any other I/O failure on a specific path
    #[error("{path}: {source}")]
    Io {
        /// The path the operation was applied to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FilesystemError {
    /// Wrap an I/O error for `path`, recognizing non-empty directory removals
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::DirectoryNotEmpty {
            return FilesystemError::DirectoryNotEmpty { path };
        }
        if source.kind() == std::io::ErrorKind::NotFound {
            return FilesystemError::Missing { path };
        }
        FilesystemError::Io { path, source }
    }
}

/// Map a storage error into the crate error with a short context message
pub(crate) fn query_failed(context: &str, e: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return Error::Database(DatabaseError::ConstraintViolation(format!(
            "{}: {}",
            context, e
        )));
    }
    Error::Database(DatabaseError::QueryFailed(format!("{}: {}", context, e)))
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "not_found",
///     "message": "not found: entry 123",
///     "details": { "path": "/data/music/a.mp3" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "network_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::UnsupportedCategory(_) => 400,
            Error::InvalidInput(_) => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,
            Error::Filesystem(FilesystemError::Missing { .. }) => 404,

            // 409 Conflict - disk holds objects the catalog does not
            Error::Filesystem(FilesystemError::DirectoryNotEmpty { .. }) => 409,
            Error::Database(DatabaseError::ConstraintViolation(_)) => 409,

            // 500 Internal Server Error - Server-side issues
            Error::Filesystem(FilesystemError::Io { .. }) => 500,
            Error::Database(_) => 500,
            Error::Sqlx(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,

            // 502 Bad Gateway - External service errors
            Error::Network(_) => 502,
            Error::Feed(_) => 502,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Database(DatabaseError::ConstraintViolation(_)) => "constraint_violation",
            Error::Database(_) => "database_error",
            Error::Sqlx(_) => "database_error",
            Error::NotFound(_) => "not_found",
            Error::Filesystem(e) => match e {
                FilesystemError::Missing { .. } => "path_missing",
                FilesystemError::DirectoryNotEmpty { .. } => "directory_not_empty",
                FilesystemError::Io { .. } => "filesystem_error",
            },
            Error::Network(_) => "network_error",
            Error::Feed(_) => "feed_error",
            Error::UnsupportedCategory(_) => "unsupported_category",
            Error::InvalidInput(_) => "invalid_input",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Filesystem(FilesystemError::Missing { path })
            | Error::Filesystem(FilesystemError::DirectoryNotEmpty { path })
            | Error::Filesystem(FilesystemError::Io { path, .. }) => Some(serde_json::json!({
                "path": path,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
