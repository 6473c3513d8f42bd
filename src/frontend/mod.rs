//! Caller-side search proxies
//!
//! A frontend stamps its backend identifier onto a request and hands it to
//! a transport. Failures come back folded into `SearchResults::error`.

mod transport;

pub use transport::{HttpTransport, LocalTransport, Transport};

use crate::engines::{DDG_SEARCH, PAGE_TEXT};
use crate::search::{SearchRequest, SearchResults};
use std::sync::Arc;
use tracing::warn;

/// Proxy bound to one backend identifier
#[derive(Clone)]
pub struct SearchFrontend {
    backend: String,
    transport: Arc<dyn Transport>,
}

impl SearchFrontend {
    pub fn new(backend: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            backend: backend.into(),
            transport,
        }
    }

    /// Frontend for the result-listing search backend
    pub fn ddg_search(transport: Arc<dyn Transport>) -> Self {
        Self::new(DDG_SEARCH, transport)
    }

    /// Frontend for the page text backend
    pub fn page_text(transport: Arc<dyn Transport>) -> Self {
        Self::new(PAGE_TEXT, transport)
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Copy of `request` with this frontend's backend stamped on it
    pub fn stamp(&self, request: SearchRequest) -> SearchRequest {
        request.with_backend(self.backend.clone())
    }

    /// Send a search through the transport
    pub async fn search(&self, request: SearchRequest) -> SearchResults {
        match self.transport.send(self.stamp(request)).await {
            Ok(results) => results,
            Err(e) => {
                warn!("Search via {} failed: {}", self.backend, e);
                SearchResults::from_error(e.to_string())
            }
        }
    }
}
