//! HTTP surface of the Board Game Helper.
//!
//! `create_app` wires the handlers to an [`AppState`]; the binary in
//! `main.rs` binds it to a socket. Tests drive the router directly.

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the router.
///
/// Only `/upload` gets the configured body limit; every other route keeps
/// axum's default.
pub fn create_app(state: AppState) -> Router {
    let max_upload = state.config().server.max_upload_bytes;

    Router::new()
        .route("/", get(routes::root))
        .route(
            "/upload",
            post(routes::upload).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/chat", post(routes::chat))
        .route(
            "/session/:session_id",
            get(routes::get_session).delete(routes::delete_session),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
