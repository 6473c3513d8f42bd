//! Search dispatch module
//!
//! Defines the request/response vocabulary and the listener that routes
//! requests to registered engines.

mod error;
mod listener;
mod models;

pub use error::{ErrorReply, SearchError};
pub use listener::SearchListener;
pub use models::*;
