//! Task history: an append-only audit trail of background task executions.
//!
//! - [`recorder`] wraps a unit of work and persists one record per run.
//! - [`retention`] trims old records down to a row-count cap.
//! - [`query`] reads records back, most recent first.
//! - [`store`] is the persistence seam; [`memory`] is an in-process backend.

pub mod failure;
pub mod memory;
pub mod query;
pub mod recorder;
pub mod retention;
pub mod store;

use chrono::SubsecRound;
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

pub use self::failure::{FailureSummary, TaskError, TaskStatus};
pub use self::memory::MemoryTaskHistoryStore;
pub use self::query::{all, find_task_history, list_task_history, TaskHistoryPage};
pub use self::recorder::TaskHistoryRecorder;
pub use self::retention::{cleanup_task_history, DEFAULT_MAX_ROWS};
pub use self::store::{StoreError, TaskHistoryStore};

// ---------------------------------------------------------------------------
// Caller-supplied task info
// ---------------------------------------------------------------------------

/// What the caller knows about a task before it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// Task name, conventionally kebab-case (`"send-pulses"`).
    pub task: String,
    /// Id of an associated resource, e.g. a database being synced.
    pub db_id: Option<DbId>,
    /// Arbitrary details to persist with the record.
    pub task_details: Option<serde_json::Value>,
}

impl TaskInfo {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            db_id: None,
            task_details: None,
        }
    }

    pub fn with_db_id(mut self, db_id: DbId) -> Self {
        self.db_id = Some(db_id);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.task_details = Some(details);
        self
    }
}

// ---------------------------------------------------------------------------
// Insert DTO
// ---------------------------------------------------------------------------

/// A record ready to be inserted.
///
/// Built only through [`NewTaskHistory::new`], which truncates both
/// timestamps to millisecond precision and clamps `ended_at` to be no earlier
/// than `started_at`. The duration is always derived from the two timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskHistory {
    task: String,
    db_id: Option<DbId>,
    task_details: Option<serde_json::Value>,
    started_at: Timestamp,
    ended_at: Timestamp,
}

impl NewTaskHistory {
    pub fn new(info: TaskInfo, started_at: Timestamp, ended_at: Timestamp) -> Self {
        let started_at = started_at.trunc_subsecs(3);
        let ended_at = ended_at.trunc_subsecs(3).max(started_at);
        Self {
            task: info.task,
            db_id: info.db_id,
            task_details: info.task_details,
            started_at,
            ended_at,
        }
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn db_id(&self) -> Option<DbId> {
        self.db_id
    }

    pub fn task_details(&self) -> Option<&serde_json::Value> {
        self.task_details.as_ref()
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn ended_at(&self) -> Timestamp {
        self.ended_at
    }

    /// Milliseconds between `started_at` and `ended_at`, never negative.
    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }

    /// Check the invariants a store must enforce before inserting.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.task.trim().is_empty() {
            return Err(StoreError::InvalidRecord("task must not be empty".into()));
        }
        Ok(())
    }

    /// Materialize the persisted row once the store has assigned an id.
    pub fn into_record(self, id: DbId) -> TaskHistory {
        let duration = self.duration_ms();
        TaskHistory {
            id,
            task: self.task,
            db_id: self.db_id,
            task_details: self.task_details,
            started_at: self.started_at,
            ended_at: self.ended_at,
            duration,
        }
    }
}

// ---------------------------------------------------------------------------
// Persisted record
// ---------------------------------------------------------------------------

/// One persisted task execution. Immutable once created (no updated_at).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskHistory {
    pub id: DbId,
    pub task: String,
    pub db_id: Option<DbId>,
    pub task_details: Option<serde_json::Value>,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    /// Milliseconds, `ended_at - started_at`.
    pub duration: i64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
