//! Search listener: routes requests to the engine registered for their backend

use super::error::SearchError;
use super::models::{SearchRequest, SearchResults};
use crate::engines::{EngineRegistry, SearchEngine};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Dispatcher owning the backend identifier to engine mapping
///
/// Engines are registered during setup; afterwards the listener is shared
/// behind an `Arc` and only read.
#[derive(Debug, Default)]
pub struct SearchListener {
    registry: EngineRegistry,
}

impl SearchListener {
    /// Create a listener over an existing registry
    pub fn new(registry: EngineRegistry) -> Self {
        Self { registry }
    }

    /// Register an engine, replacing any engine already under `id`
    pub fn register(&mut self, id: impl Into<String>, engine: Arc<dyn SearchEngine>) {
        let id = id.into();
        debug!("Registering engine {} as {}", engine.name(), id);
        self.registry.register(id, engine);
    }

    /// Registered backend identifiers
    pub fn backends(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Dispatch a request to its engine
    ///
    /// Returns `None` when the request names no backend, meaning this
    /// listener does not handle it. A named but unregistered backend is an
    /// error, whatever else the request carries.
    pub async fn dispatch(
        &self,
        request: SearchRequest,
    ) -> Option<Result<SearchResults, SearchError>> {
        let backend = request.backend_key()?;
        Some(self.dispatch_to(backend, &request).await)
    }

    /// Dispatch a raw message from a shared channel
    ///
    /// Messages without a string `backend` are ignored. Addressed messages
    /// that do not form a valid request are rejected.
    pub async fn dispatch_message(
        &self,
        message: serde_json::Value,
    ) -> Option<Result<SearchResults, SearchError>> {
        let backend = match message.get("backend").and_then(|b| b.as_str()) {
            Some(backend) if !backend.is_empty() => backend.to_string(),
            _ => {
                debug!("Ignoring message without a backend");
                return None;
            }
        };

        if let Err(e) = self.engine(&backend) {
            return Some(Err(e));
        }

        match serde_json::from_value::<SearchRequest>(message) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                warn!("Malformed search request for {}: {}", backend, e);
                Some(Err(SearchError::InvalidRequest(e.to_string())))
            }
        }
    }

    fn engine(&self, backend: &str) -> Result<&Arc<dyn SearchEngine>, SearchError> {
        self.registry.get(backend).ok_or_else(|| {
            warn!("No engine registered for backend {}", backend);
            SearchError::UnknownBackend(backend.to_string())
        })
    }

    async fn dispatch_to(
        &self,
        backend: &str,
        request: &SearchRequest,
    ) -> Result<SearchResults, SearchError> {
        let engine = self.engine(backend)?;

        if request.is_empty() {
            return Err(SearchError::InvalidRequest("query is empty".to_string()));
        }

        let start = Instant::now();
        let result = engine.search(request).await;

        match &result {
            Ok(results) => debug!(
                "Backend {} returned {} results in {:?}",
                backend,
                results.len(),
                start.elapsed()
            ),
            Err(e) => warn!("Backend {} failed: {}", backend, e),
        }

        result
    }
}
