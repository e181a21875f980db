//! Row model for the `task_history` table.
//!
//! Task history rows have no `updated_at` field (immutable records).

use sqlx::FromRow;
use taskhist_core::task_history::TaskHistory;
use taskhist_core::types::{DbId, Timestamp};

/// A single `task_history` row as stored.
#[derive(Debug, Clone, FromRow)]
pub struct TaskHistoryRow {
    pub id: DbId,
    pub task: String,
    pub db_id: Option<DbId>,
    pub task_details: Option<serde_json::Value>,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub duration: i64,
}

impl From<TaskHistoryRow> for TaskHistory {
    fn from(row: TaskHistoryRow) -> Self {
        Self {
            id: row.id,
            task: row.task,
            db_id: row.db_id,
            task_details: row.task_details,
            started_at: row.started_at,
            ended_at: row.ended_at,
            duration: row.duration,
        }
    }
}
