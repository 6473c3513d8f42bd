//! WebSearch-RS: a pluggable search-and-extraction dispatcher
//!
//! Requests name a backend; the listener routes each one to the engine
//! registered under that name, which fetches a remote page and extracts
//! normalized results from it.

pub mod config;
pub mod engines;
pub mod frontend;
pub mod network;
pub mod search;
pub mod web;

pub use config::Settings;
pub use engines::{EngineRegistry, SearchEngine};
pub use frontend::SearchFrontend;
pub use search::{SearchError, SearchListener, SearchPage, SearchRequest, SearchResult, SearchResults};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum timeout a transport waits for an answer, in seconds
pub const MAX_TIMEOUT: u64 = 30;
