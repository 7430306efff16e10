//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::session::TransitionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the remote quiz API client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The server answered with `success: false`.
    #[error("quiz API rejected the request: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),
    #[error("quiz API request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("quiz API response is missing `{0}`")]
    MissingField(&'static str),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Server-supplied rejection message, if any.
    #[must_use]
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(message) => message.as_deref(),
            _ => None,
        }
    }
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz has no questions")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by `ReportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API URL `{raw}`: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API URL `{raw}` cannot take path segments")]
    UnsupportedUrl { raw: String },
    #[error("invalid value for {name}: `{raw}`")]
    InvalidNumber { name: &'static str, raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
