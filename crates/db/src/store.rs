//! [`TaskHistoryStore`] backed by the SQLite pool.

use async_trait::async_trait;
use taskhist_core::task_history::{NewTaskHistory, StoreError, TaskHistory, TaskHistoryStore};
use taskhist_core::types::{DbId, Timestamp};

use crate::repositories::TaskHistoryRepo;
use crate::DbPool;

/// Durable task history store. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct SqlTaskHistoryStore {
    pool: DbPool,
}

impl SqlTaskHistoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskHistoryStore for SqlTaskHistoryStore {
    async fn insert(&self, record: &NewTaskHistory) -> Result<DbId, StoreError> {
        record.validate()?;
        let row = TaskHistoryRepo::insert(&self.pool, record)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.id)
    }

    async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<TaskHistory>, StoreError> {
        let rows = TaskHistoryRepo::list(&self.pool, limit, offset)
            .await
            .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(TaskHistory::from).collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        TaskHistoryRepo::count(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<TaskHistory>, StoreError> {
        let row = TaskHistoryRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::backend)?;
        Ok(row.map(TaskHistory::from))
    }

    async fn delete_at_or_before(&self, ended_at: Timestamp, id: DbId) -> Result<u64, StoreError> {
        TaskHistoryRepo::delete_at_or_before(&self.pool, ended_at, id)
            .await
            .map_err(StoreError::backend)
    }
}
