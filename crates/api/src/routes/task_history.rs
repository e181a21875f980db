//! Route definitions for task history.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::task_history;
use crate::state::AppState;

/// Task history routes, mounted at `/task-history`.
///
/// ```text
/// GET    /                 -> list
/// GET    /{id}             -> get_by_id
/// POST   /cleanup          -> cleanup
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task_history::list))
        .route("/cleanup", post(task_history::cleanup))
        .route("/{id}", get(task_history::get_by_id))
}
