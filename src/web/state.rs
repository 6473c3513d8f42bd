//! Application state shared across handlers

use crate::search::SearchListener;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Search listener, read-only once serving
    pub listener: Arc<SearchListener>,
}

impl AppState {
    /// Create new application state
    pub fn new(listener: SearchListener) -> Self {
        Self {
            listener: Arc::new(listener),
        }
    }
}
