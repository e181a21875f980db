use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// `GET /health` payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when both checks pass, `"degraded"` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    /// Whether a trivial query on the pool succeeded.
    pub db_healthy: bool,
    /// Rows currently in `task_history`; `null` when the count failed.
    pub task_history_rows: Option<i64>,
}

/// Reports pool reachability and whether the task history table answers.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = taskhist_db::health_check(&state.pool).await.is_ok();
    let task_history_rows = match state.task_history.count().await {
        Ok(rows) => Some(rows),
        Err(err) => {
            tracing::warn!(error = %err, "Task history count failed during health check");
            None
        }
    };

    let status = if db_healthy && task_history_rows.is_some() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        task_history_rows,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
