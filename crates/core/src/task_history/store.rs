//! Persistence seam for task history records.

use async_trait::async_trait;

use super::{NewTaskHistory, TaskHistory};
use crate::types::{DbId, Timestamp};

/// Errors raised by a [`TaskHistoryStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected the operation (connectivity, constraint, I/O).
    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The record failed validation before reaching the backend.
    #[error("Invalid task history record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Durable storage for task history rows.
///
/// Implementations must order reads by `ended_at` descending, breaking ties
/// by `id` descending, and must serialize concurrent inserts safely.
#[async_trait]
pub trait TaskHistoryStore: Send + Sync {
    /// Insert one record and return its assigned id.
    async fn insert(&self, record: &NewTaskHistory) -> Result<DbId, StoreError>;

    /// Records ordered most recent first. `limit` and `offset` are applied
    /// only when supplied.
    async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<TaskHistory>, StoreError>;

    /// Total number of stored records.
    async fn count(&self) -> Result<i64, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<TaskHistory>, StoreError>;

    /// Delete the record `(ended_at, id)` and every record ranked after it in
    /// the most-recent-first order: rows that ended earlier, plus rows that
    /// ended at the same instant with a smaller id. Returns rows deleted.
    async fn delete_at_or_before(&self, ended_at: Timestamp, id: DbId) -> Result<u64, StoreError>;
}
