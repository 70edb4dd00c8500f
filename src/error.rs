//! Error types for the storefront data orchestration pipeline.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure reason for a single query execution.
///
/// Cloneable so one fetch outcome can be handed to every caller that joined it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The remote system reports that the requested entity does not exist.
    #[error("Entity not found: {0}")]
    NotFoundByIdentifier(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    /// Malformed or unexpected response shape.
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// The endpoint answered with GraphQL errors other than a missing entity.
    #[error("Remote error: {0}")]
    RemoteError(String),

    /// Only produced under the `cache-only` policy.
    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::NotFoundByIdentifier(_) => ErrorKind::NotFoundByIdentifier,
            QueryError::Timeout(_) => ErrorKind::Timeout,
            QueryError::TransportError(_) => ErrorKind::TransportError,
            QueryError::SchemaError(_) => ErrorKind::SchemaError,
            QueryError::RemoteError(_) => ErrorKind::RemoteError,
            QueryError::CacheMiss(_) => ErrorKind::CacheMiss,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NotFoundByIdentifier(_))
    }
}

/// Stable error classification, logged as `error_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFoundByIdentifier,
    Timeout,
    TransportError,
    SchemaError,
    RemoteError,
    CacheMiss,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFoundByIdentifier => "not_found_by_identifier",
            ErrorKind::Timeout => "timeout",
            ErrorKind::TransportError => "transport_error",
            ErrorKind::SchemaError => "schema_error",
            ErrorKind::RemoteError => "remote_error",
            ErrorKind::CacheMiss => "cache_miss",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page-level failures propagated to the static-generation runtime.
#[derive(Debug, Clone, Error)]
pub enum PageError {
    #[error("Page '{page}': required query '{descriptor}' failed: {source}")]
    QueryFailed {
        page: String,
        descriptor: String,
        #[source]
        source: QueryError,
    },

    #[error("Invalid page definition: {0}")]
    InvalidDefinition(String),
}

impl PageError {
    /// The query failure behind this error, if any.
    pub fn query_error(&self) -> Option<&QueryError> {
        match self {
            PageError::QueryFailed { source, .. } => Some(source),
            PageError::InvalidDefinition(_) => None,
        }
    }
}

/// Errors surfaced by the runtime-facing API and CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown page route: {0}")]
    UnknownRoute(String),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::RenderFailed(err.to_string())
    }
}
