mod middleware;
mod posts;
mod selectors;
pub mod sessions;
mod state;

pub use state::HttpState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use middleware::{log_responses, set_request_context};

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(posts::index))
        .route("/sessions/{session}/posts/new", post(posts::begin_create))
        .route("/sessions/{session}/posts/cancel", post(posts::cancel_edit))
        .route("/sessions/{session}/posts/close", post(posts::close_modal))
        .route("/sessions/{session}/posts/submit", post(posts::submit))
        .route("/sessions/{session}/posts/{id}/edit", post(posts::begin_edit))
        .route("/sessions/{session}/posts/{id}/delete", post(posts::delete))
        .route("/health", get(posts::health))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
