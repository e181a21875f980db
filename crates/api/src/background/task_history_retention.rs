//! Periodic row-count retention for task history.
//!
//! Trims `task_history` to the configured `TASK_HISTORY_MAX_ROWS` on a fixed
//! interval. Each run is itself recorded as a `task-history-cleanup` task,
//! so a failing cleanup leaves a trace in the table it was trimming.

use std::time::Duration;

use taskhist_core::task_history::{cleanup_task_history, StoreError, TaskInfo};
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Task name under which cleanup runs are recorded.
pub const CLEANUP_TASK: &str = "task-history-cleanup";

/// Run one recorded cleanup, keeping the `keep` most recent rows.
///
/// Returns whether anything was deleted.
pub async fn run_once(state: &AppState, keep: u64) -> Result<bool, StoreError> {
    let store = state.task_history.clone();
    state
        .recorder
        .with_task_history(
            TaskInfo::new(CLEANUP_TASK).with_details(serde_json::json!({ "keep": keep })),
            || async move { cleanup_task_history(store.as_ref(), keep).await },
        )
        .await
}

/// Run the task history retention loop until `cancel` is triggered.
///
/// The first tick fires immediately, so a cleanup runs at startup.
pub async fn run(state: AppState, cancel: CancellationToken) {
    let keep = state.config.task_history.max_rows;
    let interval_secs = state.config.task_history.cleanup_interval_secs;

    tracing::info!(keep, interval_secs, "Task history retention job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Task history retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match run_once(&state, keep).await {
                    Ok(true) => tracing::debug!("Task history retention: cleanup ran"),
                    Ok(false) => tracing::debug!("Task history retention: under cap"),
                    Err(e) => {
                        tracing::error!(error = %e, "Task history retention: cleanup failed");
                    }
                }
            }
        }
    }
}
