//! Read side of task history.
//!
//! Permission checks are the caller's job: the HTTP layer rejects actors
//! lacking the task history scope before any of these functions run.

use serde::Serialize;

use super::store::TaskHistoryStore;
use super::TaskHistory;
use crate::error::CoreError;
use crate::pagination::{validate_limit, validate_offset};
use crate::types::DbId;

/// Paginated listing of task history rows.
#[derive(Debug, Clone, Serialize)]
pub struct TaskHistoryPage {
    pub items: Vec<TaskHistory>,
    pub total: i64,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Records ordered by `ended_at` descending. `limit` (positive) and
/// `offset` (non-negative) are applied only when supplied.
pub async fn all(
    store: &dyn TaskHistoryStore,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<TaskHistory>, CoreError> {
    let limit = validate_limit(limit)?;
    let offset = validate_offset(offset)?;
    Ok(store.list(limit, offset).await?)
}

/// Like [`all`], with the total row count for pagination metadata.
pub async fn list_task_history(
    store: &dyn TaskHistoryStore,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<TaskHistoryPage, CoreError> {
    let items = all(store, limit, offset).await?;
    let total = store.count().await?;
    Ok(TaskHistoryPage {
        items,
        total,
        limit,
        offset,
    })
}

pub async fn find_task_history(
    store: &dyn TaskHistoryStore,
    id: DbId,
) -> Result<TaskHistory, CoreError> {
    store.find_by_id(id).await?.ok_or(CoreError::NotFound {
        entity: "TaskHistory",
        id,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_history::memory::MemoryTaskHistoryStore;
    use crate::task_history::{NewTaskHistory, TaskInfo};
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    async fn seeded(n: i64) -> MemoryTaskHistoryStore {
        let store = MemoryTaskHistoryStore::new();
        let base = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        for i in 1..=n {
            let end = base + Duration::minutes(i);
            let record = NewTaskHistory::new(TaskInfo::new(format!("rank-{}", n - i + 1)), end, end);
            store.insert(&record).await.unwrap();
        }
        store
    }

    fn tasks(rows: &[TaskHistory]) -> Vec<&str> {
        rows.iter().map(|r| r.task.as_str()).collect()
    }

    #[tokio::test]
    async fn all_without_pagination_returns_everything_most_recent_first() {
        let store = seeded(5).await;
        let rows = all(&store, None, None).await.unwrap();
        assert_eq!(tasks(&rows), vec!["rank-1", "rank-2", "rank-3", "rank-4", "rank-5"]);
    }

    #[tokio::test]
    async fn limit_two_offset_one_returns_second_and_third() {
        let store = seeded(5).await;
        let rows = all(&store, Some(2), Some(1)).await.unwrap();
        assert_eq!(tasks(&rows), vec!["rank-2", "rank-3"]);
    }

    #[tokio::test]
    async fn limit_and_offset_apply_independently() {
        let store = seeded(5).await;
        assert_eq!(tasks(&all(&store, Some(2), None).await.unwrap()), vec!["rank-1", "rank-2"]);
        assert_eq!(
            tasks(&all(&store, None, Some(3)).await.unwrap()),
            vec!["rank-4", "rank-5"]
        );
    }

    #[tokio::test]
    async fn invalid_pagination_is_rejected() {
        let store = seeded(1).await;
        assert_matches!(all(&store, Some(0), None).await, Err(CoreError::Validation(_)));
        assert_matches!(all(&store, None, Some(-1)).await, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn page_reports_total() {
        let store = seeded(5).await;
        let page = list_task_history(&store, Some(2), Some(0)).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.limit, Some(2));
    }

    #[tokio::test]
    async fn find_missing_row_is_not_found() {
        let store = seeded(1).await;
        assert_matches!(
            find_task_history(&store, 999).await,
            Err(CoreError::NotFound { entity: "TaskHistory", id: 999 })
        );
        assert_eq!(find_task_history(&store, 1).await.unwrap().task, "rank-1");
    }
}
