//! Permission extractors for task history.
//!
//! Both wrap [`AuthUser`] and reject with 403 when the caller's capabilities
//! do not cover the task history scope for the current
//! `ADVANCED_PERMISSIONS_ENABLED` setting. Read and write resolve to the same
//! scope, so a denial looks identical for either.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use taskhist_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

fn denied(user: &AuthUser, operation: &'static str) -> AppError {
    tracing::debug!(
        user_id = user.user_id,
        role = %user.role,
        operation,
        "Task history access denied"
    );
    AppError::Core(CoreError::Forbidden(
        "Insufficient permissions for task history".into(),
    ))
}

/// Requires permission to read task history.
///
/// ```ignore
/// async fn list(RequireTaskHistoryRead(user): RequireTaskHistoryRead) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireTaskHistoryRead(pub AuthUser);

impl FromRequestParts<AppState> for RequireTaskHistoryRead {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.can_read_task_history(state.config.advanced_permissions_enabled) {
            return Err(denied(&user, "read"));
        }
        Ok(RequireTaskHistoryRead(user))
    }
}

/// Requires permission to modify task history (cleanup).
pub struct RequireTaskHistoryWrite(pub AuthUser);

impl FromRequestParts<AppState> for RequireTaskHistoryWrite {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.can_write_task_history(state.config.advanced_permissions_enabled) {
            return Err(denied(&user, "write"));
        }
        Ok(RequireTaskHistoryWrite(user))
    }
}
