//! Handlers for the task history audit trail.
//!
//! Reads require the task history read scope; cleanup requires the write
//! scope. Both scopes resolve to the same capability set.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskhist_core::task_history::{find_task_history, list_task_history};
use taskhist_core::types::DbId;

use crate::background::task_history_retention;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireTaskHistoryRead, RequireTaskHistoryWrite};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /task-history/cleanup`.
#[derive(Debug, Default, Deserialize)]
pub struct CleanupRequest {
    /// Rows to keep. Falls back to the configured `TASK_HISTORY_MAX_ROWS`.
    pub keep: Option<u64>,
}

/// Outcome of a cleanup request.
#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    /// Whether any rows were deleted.
    pub deleted: bool,
    /// The keep count that was applied.
    pub keep: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /task-history
///
/// List task history records, most recent first.
pub async fn list(
    State(state): State<AppState>,
    RequireTaskHistoryRead(_user): RequireTaskHistoryRead,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let page = list_task_history(state.task_history.as_ref(), params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /task-history/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireTaskHistoryRead(_user): RequireTaskHistoryRead,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = find_task_history(state.task_history.as_ref(), id).await?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /task-history/cleanup
///
/// Trim task history to the most recent `keep` rows. The run itself is
/// recorded as a `task-history-cleanup` task. A request without a JSON
/// body uses the configured keep count; an undecodable one is a 400.
pub async fn cleanup(
    State(state): State<AppState>,
    RequireTaskHistoryWrite(user): RequireTaskHistoryWrite,
    body: Result<Option<Json<CleanupRequest>>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let request = body
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?
        .map(|Json(r)| r)
        .unwrap_or_default();
    let keep = request.keep.unwrap_or(state.config.task_history.max_rows);

    tracing::info!(user_id = user.user_id, keep, "Manual task history cleanup");
    let deleted = task_history_retention::run_once(&state, keep).await?;

    Ok(Json(DataResponse {
        data: CleanupResponse { deleted, keep },
    }))
}
