//! Web server module
//!
//! Exposes the search listener as an HTTP message endpoint.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
