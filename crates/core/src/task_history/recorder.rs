//! Instrumented execution: time a unit of work and persist one record.
//!
//! ```ignore
//! let synced = recorder
//!     .with_task_history(TaskInfo::new("sync-database").with_db_id(db_id), || async {
//!         sync(db_id).await
//!     })
//!     .await?;
//! ```
//!
//! The wrapped work's result always reaches the caller untouched, panics
//! included: they are recorded and then resumed. Recording is best-effort:
//! store failures are logged at `warn` and dropped, never retried and never
//! surfaced.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use super::failure::FailureSummary;
use super::store::TaskHistoryStore;
use super::{NewTaskHistory, TaskInfo};
use crate::clock::{Clock, SystemClock};

/// Wraps units of work and writes a task history row for each run.
///
/// Cheap to clone; every clone shares the same store and clock.
#[derive(Clone)]
pub struct TaskHistoryRecorder {
    store: Arc<dyn TaskHistoryStore>,
    clock: Arc<dyn Clock>,
}

impl TaskHistoryRecorder {
    pub fn new(store: Arc<dyn TaskHistoryStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn TaskHistoryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Run `work`, record the execution, and return the work's result.
    ///
    /// On `Ok` the caller's `task_details` are stored as-is. On `Err` they
    /// are replaced by a [`FailureSummary`] merged over the caller's map, and
    /// the original error value is returned unchanged.
    ///
    /// The work runs on the caller's task; no timeout or cancellation is
    /// imposed. A panic inside `work` is recorded as a failed run with
    /// exception `"panic"` and then resumed.
    pub async fn with_task_history<F, Fut, T, E>(&self, info: TaskInfo, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::error::Error + 'static,
    {
        self.run_recorded(info, work, FailureSummary::capture).await
    }

    /// [`with_task_history`](Self::with_task_history) for work that fails
    /// with [`anyhow::Error`], which does not implement `std::error::Error`.
    pub async fn with_task_history_anyhow<F, Fut, T>(
        &self,
        info: TaskInfo,
        work: F,
    ) -> anyhow::Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        self.run_recorded(info, work, FailureSummary::capture_anyhow)
            .await
    }

    async fn run_recorded<F, Fut, T, E>(
        &self,
        info: TaskInfo,
        work: F,
        summarize: fn(&E, Option<serde_json::Value>) -> FailureSummary,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let started_at = self.clock.now();
        let outcome = AssertUnwindSafe(async move { work().await })
            .catch_unwind()
            .await;
        let ended_at = self.clock.now();

        let failure = match &outcome {
            Ok(Ok(_)) => None,
            Ok(Err(err)) => Some(summarize(err, info.task_details.clone())),
            Err(payload) => Some(FailureSummary::from_panic(
                &**payload,
                info.task_details.clone(),
            )),
        };

        let info = match failure {
            None => info,
            Some(summary) => {
                tracing::debug!(
                    task = %info.task,
                    exception = %summary.exception,
                    error = %summary.message,
                    "Task failed, recording failure details"
                );
                TaskInfo {
                    task_details: Some(summary.into_task_details()),
                    ..info
                }
            }
        };

        self.record(NewTaskHistory::new(info, started_at, ended_at))
            .await;

        match outcome {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }

    /// Best-effort insert. Never fails.
    async fn record(&self, record: NewTaskHistory) {
        match self.store.insert(&record).await {
            Ok(id) => {
                tracing::debug!(
                    id,
                    task = record.task(),
                    duration_ms = record.duration_ms(),
                    "Recorded task history"
                );
            }
            Err(e) => {
                tracing::warn!(
                    task = record.task(),
                    duration_ms = record.duration_ms(),
                    error = %e,
                    "Failed to record task history"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
