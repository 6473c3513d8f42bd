//! Request, page, and result data models shared by every engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status stored in a [`SearchPage`] when the fetch failed and `html`
/// carries a human-readable explanation instead of a response body.
pub const FAILURE_STATUS: u16 = 666;

/// Parameters of a single search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free text or a URL
    pub query: String,
    /// Identifier of the engine that should serve the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    /// Maximum number of results to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_results: Option<usize>,
    /// Engine-specific region code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Engine-specific time range code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timerange: Option<String>,
}

impl SearchRequest {
    /// Create a request for a query with no backend stamped yet
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the backend identifier
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    /// Cap the number of results
    pub fn with_num_results(mut self, num_results: usize) -> Self {
        self.num_results = Some(num_results);
        self
    }

    /// Set the region code
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the time range code
    pub fn with_timerange(mut self, timerange: impl Into<String>) -> Self {
        self.timerange = Some(timerange.into());
        self
    }

    /// The backend identifier, treating an empty string as absent
    pub fn backend_key(&self) -> Option<&str> {
        self.backend.as_deref().filter(|b| !b.is_empty())
    }

    /// Check if the query is empty
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// Raw page produced by an engine's fetch step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    /// Transport status, or [`FAILURE_STATUS`]
    pub status: u16,
    /// Response body, or the failure message
    pub html: String,
    /// Final URL after redirects
    pub url: String,
}

impl SearchPage {
    pub fn new(status: u16, html: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status,
            html: html.into(),
            url: url.into(),
        }
    }

    /// A page standing in for a failed fetch
    pub fn failed(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(FAILURE_STATUS, message, url)
    }

    /// Whether this page marks a failed fetch
    pub fn is_failure(&self) -> bool {
        self.status == FAILURE_STATUS
    }
}

/// A single normalized hit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub title: String,
    pub body: String,
    pub url: String,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, body: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: url.into(),
        }
    }
}

/// Ordered results of a search, plus an optional carried error
///
/// Order is the order extraction produced; nothing re-sorts it. When
/// `error` is set the printable form reports only the error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SearchResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results carrying only an error
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn push(&mut self, result: SearchResult) {
        self.results.push(result);
    }

    /// Keep at most `len` results
    pub fn truncate(&mut self, len: usize) {
        self.results.truncate(len);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl From<Vec<SearchResult>> for SearchResults {
    fn from(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            error: None,
        }
    }
}

impl FromIterator<SearchResult> for SearchResults {
    fn from_iter<I: IntoIterator<Item = SearchResult>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl IntoIterator for SearchResults {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl fmt::Display for SearchResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref error) = self.error {
            return write!(f, "Error: {}", error);
        }

        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}. {}\n{}\n{}", i + 1, result.title, result.body, result.url)?;
        }
        Ok(())
    }
}
