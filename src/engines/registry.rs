//! Engine registry mapping backend identifiers to engines

use super::traits::SearchEngine;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all available search engines
#[derive(Clone, Default)]
pub struct EngineRegistry {
    /// Engines by backend identifier
    engines: HashMap<String, Arc<dyn SearchEngine>>,
}

impl EngineRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine under a backend identifier, replacing any previous one
    pub fn register(&mut self, id: impl Into<String>, engine: Arc<dyn SearchEngine>) {
        self.engines.insert(id.into(), engine);
    }

    /// Get an engine by backend identifier
    pub fn get(&self, id: &str) -> Option<&Arc<dyn SearchEngine>> {
        self.engines.get(id)
    }

    /// Get all backend identifiers, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.engines.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Check if a backend identifier is registered
    pub fn contains(&self, id: &str) -> bool {
        self.engines.contains_key(id)
    }

    /// Get number of registered engines
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.names())
            .finish()
    }
}
