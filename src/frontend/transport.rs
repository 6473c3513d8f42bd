//! Transports carrying search requests from a frontend to a listener

use crate::search::{ErrorReply, SearchError, SearchListener, SearchRequest, SearchResults};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Delivers a stamped request to a listener and returns its answer
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: SearchRequest) -> Result<SearchResults, SearchError>;
}

/// In-process transport calling a listener directly
#[derive(Clone)]
pub struct LocalTransport {
    listener: Arc<SearchListener>,
}

impl LocalTransport {
    pub fn new(listener: Arc<SearchListener>) -> Self {
        Self { listener }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn send(&self, request: SearchRequest) -> Result<SearchResults, SearchError> {
        self.listener
            .dispatch(request)
            .await
            .unwrap_or(Err(SearchError::NotHandled))
    }
}

/// Transport posting requests to a running server's `/search` route
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for the server at `base_url`
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let endpoint = Url::parse(base_url)?.join("search")?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(crate::MAX_TIMEOUT))
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: SearchRequest) -> Result<SearchResults, SearchError> {
        debug!("Sending search request to {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Err(SearchError::NotHandled);
        }

        if status.is_success() {
            return response
                .json::<SearchResults>()
                .await
                .map_err(|e| SearchError::Transport(format!("{}: {}", status, e)));
        }

        // Rebuild the listener's error from the reply; anything else is a transport failure
        let reply = response
            .json::<ErrorReply>()
            .await
            .map_err(|e| SearchError::Transport(format!("{}: {}", status, e)))?;

        Err(reply.cause.unwrap_or_else(|| {
            let message = reply.results.error().unwrap_or("no error message");
            SearchError::Transport(format!("{}: {}", status, message))
        }))
    }
}
