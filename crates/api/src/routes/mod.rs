pub mod health;
pub mod task_history;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /task-history                                     list (read scope)
/// /task-history/{id}                                get (read scope)
/// /task-history/cleanup                             trim to keep count (POST, write scope)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/task-history", task_history::router())
}
