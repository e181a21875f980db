//! Repository for the `task_history` table (append-only audit trail).

use taskhist_core::task_history::NewTaskHistory;
use taskhist_core::types::{DbId, Timestamp};

use crate::models::task_history::TaskHistoryRow;
use crate::DbPool;

/// Column list for `task_history` SELECT queries.
const COLUMNS: &str = "\
    id, task, db_id, task_details, started_at, ended_at, duration";

/// Column list for `task_history` INSERT statements (excludes auto-generated `id`).
const INSERT_COLUMNS: &str = "\
    task, db_id, task_details, started_at, ended_at, duration";

/// Most recent first. `id` breaks ties between equal end times.
const RECENCY_ORDER: &str = "ended_at DESC, id DESC";

/// Provides query operations for task history.
pub struct TaskHistoryRepo;

impl TaskHistoryRepo {
    /// Insert a single task history record.
    pub async fn insert(
        pool: &DbPool,
        record: &NewTaskHistory,
    ) -> Result<TaskHistoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_history ({INSERT_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskHistoryRow>(&query)
            .bind(record.task())
            .bind(record.db_id())
            .bind(record.task_details())
            .bind(record.started_at())
            .bind(record.ended_at())
            .bind(record.duration_ms())
            .fetch_one(pool)
            .await
    }

    /// List records most recent first.
    ///
    /// `None` for `limit` returns every row after `offset`.
    pub async fn list(
        pool: &DbPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<TaskHistoryRow>, sqlx::Error> {
        // SQLite treats a negative LIMIT as "no limit".
        let query = format!(
            "SELECT {COLUMNS} FROM task_history \
             ORDER BY {RECENCY_ORDER} \
             LIMIT ? OFFSET ?"
        );
        sqlx::query_as::<_, TaskHistoryRow>(&query)
            .bind(limit.unwrap_or(-1))
            .bind(offset.unwrap_or(0))
            .fetch_all(pool)
            .await
    }

    /// Total number of stored records.
    pub async fn count(pool: &DbPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM task_history")
            .fetch_one(pool)
            .await
    }

    /// Find a single record by id.
    pub async fn find_by_id(
        pool: &DbPool,
        id: DbId,
    ) -> Result<Option<TaskHistoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_history WHERE id = ?");
        sqlx::query_as::<_, TaskHistoryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete every record ranked at or below the given `(ended_at, id)`
    /// position in recency order. Returns the number of rows removed.
    pub async fn delete_at_or_before(
        pool: &DbPool,
        ended_at: Timestamp,
        id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM task_history \
             WHERE ended_at < ?1 OR (ended_at = ?1 AND id <= ?2)",
        )
        .bind(ended_at)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
