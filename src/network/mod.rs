//! HTTP networking module
//!
//! Provides the HTTP client engines use to fetch pages.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::{accept_html, generate_user_agent};
