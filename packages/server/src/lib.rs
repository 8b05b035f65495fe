//! HTTP API for deal documents.
//!
//! `POST /create` renders a deal into Word documents and returns them as a
//! zip archive or sends them by email.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/create", post(handlers::create).get(handlers::create))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
