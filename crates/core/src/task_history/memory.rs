//! In-process [`TaskHistoryStore`] backed by a `Vec` behind a mutex.
//!
//! Used by tests and by callers that want an ephemeral audit trail.
//! Insert failures can be injected with [`MemoryTaskHistoryStore::fail_inserts`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::store::{StoreError, TaskHistoryStore};
use super::{NewTaskHistory, TaskHistory};
use crate::types::{DbId, Timestamp};

#[derive(Debug, thiserror::Error)]
#[error("injected insert failure")]
struct InjectedFailure;

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<TaskHistory>,
    next_id: DbId,
}

#[derive(Debug, Default)]
pub struct MemoryTaskHistoryStore {
    inner: Mutex<Inner>,
    fail_inserts: AtomicBool,
}

impl MemoryTaskHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert fail with a backend error.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all rows, most recent first.
    pub fn rows(&self) -> Vec<TaskHistory> {
        let mut rows = self.lock().rows.clone();
        sort_most_recent_first(&mut rows);
        rows
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn sort_most_recent_first(rows: &mut [TaskHistory]) {
    rows.sort_by(|a, b| b.ended_at.cmp(&a.ended_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl TaskHistoryStore for MemoryTaskHistoryStore {
    async fn insert(&self, record: &NewTaskHistory) -> Result<DbId, StoreError> {
        record.validate()?;
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::backend(InjectedFailure));
        }
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.push(record.clone().into_record(id));
        Ok(id)
    }

    async fn list(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<TaskHistory>, StoreError> {
        let skip = offset.map_or(0, |o| usize::try_from(o).unwrap_or(0));
        let take = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(0));
        Ok(self.rows().into_iter().skip(skip).take(take).collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.lock().rows.len() as i64)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<TaskHistory>, StoreError> {
        Ok(self.lock().rows.iter().find(|r| r.id == id).cloned())
    }

    async fn delete_at_or_before(&self, ended_at: Timestamp, id: DbId) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let before = inner.rows.len();
        inner
            .rows
            .retain(|r| r.ended_at > ended_at || (r.ended_at == ended_at && r.id > id));
        Ok((before - inner.rows.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
