//! Engine traits and types

use crate::config::EngineConfig;
use crate::search::{SearchError, SearchPage, SearchRequest, SearchResults};
use async_trait::async_trait;
use std::collections::HashMap;

/// HTTP request to be made by the engine
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// POST body data
    pub data: Option<RequestBody>,
}

impl EngineRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::with_method(url, HttpMethod::Get)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::with_method(url, HttpMethod::Post)
    }

    fn with_method(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            data: None,
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add form data (sets content-type to form-urlencoded)
    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        self.data = Some(RequestBody::Form(data));
        self
    }

    /// Check whether a header was set, ignoring case
    pub fn has_header(&self, key: &str) -> bool {
        self.headers.keys().any(|k| k.eq_ignore_ascii_case(key))
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Request body types
#[derive(Debug, Clone)]
pub enum RequestBody {
    Form(HashMap<String, String>),
}

/// HTTP response from engine request
#[derive(Debug)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase for the status
    pub reason: String,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl EngineResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success response into a fetch error
    pub fn error_for_status(self) -> Result<Self, SearchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SearchError::Fetch {
                status: self.status,
                reason: self.reason,
            })
        }
    }
}

impl From<EngineResponse> for SearchPage {
    fn from(response: EngineResponse) -> Self {
        SearchPage::new(response.status, response.text, response.url)
    }
}

/// A search backend: fetches a remote page and extracts results from it
///
/// Engines differ only in `fetch` and `extract`; `search` composes them
/// and is not meant to be overridden.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Retrieve the page for a request
    async fn fetch(&self, request: &SearchRequest) -> Result<SearchPage, SearchError>;

    /// Turn a fetched page into results
    fn extract(&self, request: &SearchRequest, page: SearchPage) -> SearchResults;

    /// Fetch then extract
    async fn search(&self, request: &SearchRequest) -> Result<SearchResults, SearchError> {
        let page = self.fetch(request).await?;
        Ok(self.extract(request, page))
    }

    /// Optional initialization (called once by the loader)
    fn init(&mut self, _config: &EngineConfig) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> EngineResponse {
        EngineResponse {
            status,
            reason: "Service Unavailable".to_string(),
            text: "<html></html>".to_string(),
            url: "https://example.com/".to_string(),
        }
    }

    #[test]
    fn test_error_for_status() {
        assert!(response(200).error_for_status().is_ok());

        let err = response(503).error_for_status().unwrap_err();
        assert_eq!(
            err,
            SearchError::Fetch {
                status: 503,
                reason: "Service Unavailable".to_string()
            }
        );
    }

    #[test]
    fn test_response_into_page() {
        let page = SearchPage::from(response(200));
        assert_eq!(page.status, 200);
        assert_eq!(page.url, "https://example.com/");
        assert_eq!(page.html, "<html></html>");
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let request = EngineRequest::get("https://example.com").header("Origin", "x");
        assert!(request.has_header("origin"));
        assert!(!request.has_header("accept"));
    }
}
