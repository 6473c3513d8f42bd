//! HTTP request handlers

use super::state::AppState;
use crate::search::{ErrorReply, SearchError};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Search handler
///
/// Accepts any JSON message; messages the listener does not handle get
/// `204 No Content`.
pub async fn search(
    State(state): State<AppState>,
    Json(message): Json<serde_json::Value>,
) -> Response {
    match state.listener.dispatch_message(message).await {
        None => StatusCode::NO_CONTENT.into_response(),
        Some(Ok(results)) => Json(results).into_response(),
        Some(Err(e)) => (error_status(&e), Json(ErrorReply::from(e))).into_response(),
    }
}

fn error_status(error: &SearchError) -> StatusCode {
    match error {
        SearchError::UnknownBackend(_) => StatusCode::NOT_FOUND,
        SearchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        e if e.is_fetch() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Registered backends handler
pub async fn engines(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "engines": state.listener.backends()
    }))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
