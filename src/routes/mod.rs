//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under `/api`, the browser-facing GitHub
//! login redirects, and the health probe under a single Axum router.

pub mod auth;
pub mod questions;
pub mod settings;
pub mod todos;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/login/github", get(auth::github_login))
        .route("/api/login/github/callback", get(auth::github_callback))
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/signout", post(auth::signout))
        .route("/api/todos", get(todos::list_todos).put(todos::save_todos))
        .route("/api/settings/layout", get(settings::get_layout).put(settings::put_layout))
        .route("/api/questions/daily", get(questions::daily))
        .route("/api/questions/search", get(questions::search))
        .route("/healthz", get(healthz))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
