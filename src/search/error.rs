//! Search error types

use super::models::SearchResults;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures that propagate out of a search
///
/// Degraded page fetches and extraction misses never appear here; engines
/// turn those into ordinary results.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SearchError {
    /// Upstream answered with a non-success status
    #[error("Failed to fetch: {status} {reason}")]
    Fetch { status: u16, reason: String },

    /// The request never produced a response
    #[error("Failed to fetch: {0}")]
    Network(String),

    /// The backend identifier has no registered engine
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    /// The request violates the request invariants
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No listener on the other side of a transport handled the message
    #[error("No listener handled the search request")]
    NotHandled,

    /// The transport itself failed
    #[error("Transport error: {0}")]
    Transport(String),
}

impl SearchError {
    /// Whether this error came from reaching the upstream service
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Network(_))
    }
}

/// Body of a failed search sent over HTTP
///
/// Readers that only know `SearchResults` still see the printable error;
/// transports rebuild the typed error from `cause`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    #[serde(flatten)]
    pub results: SearchResults,
    #[serde(default)]
    pub cause: Option<SearchError>,
}

impl From<SearchError> for ErrorReply {
    fn from(error: SearchError) -> Self {
        Self {
            results: SearchResults::from_error(error.to_string()),
            cause: Some(error),
        }
    }
}
