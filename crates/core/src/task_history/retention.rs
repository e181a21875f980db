//! Row-count retention for task history.
//!
//! Cleanup reads the (N+1)-th most recent row and deletes it together with
//! every row ranked after it. Rows sharing the cutoff timestamp are ranked by
//! id, so exactly N rows survive and nothing older than the cutoff does.
//!
//! Concurrent cleanups may compute different cutoffs; deleting an
//! already-deleted row is a no-op.

use super::store::{StoreError, TaskHistoryStore};

/// Default number of most recent rows kept by cleanup.
pub const DEFAULT_MAX_ROWS: u64 = 100_000;

/// Trim task history so that only the `keep` most recent rows remain.
///
/// Returns `Ok(false)` when there are at most `keep` rows (nothing to do) and
/// `Ok(true)` when a delete was issued.
pub async fn cleanup_task_history(
    store: &dyn TaskHistoryStore,
    keep: u64,
) -> Result<bool, StoreError> {
    let offset = i64::try_from(keep).unwrap_or(i64::MAX);
    let cutoff_row = store.list(Some(1), Some(offset)).await?;

    let Some(cutoff) = cutoff_row.first() else {
        tracing::debug!(keep, "Task history retention: nothing to purge");
        return Ok(false);
    };

    let deleted = store
        .delete_at_or_before(cutoff.ended_at, cutoff.id)
        .await?;
    tracing::info!(
        keep,
        deleted,
        cutoff = %cutoff.ended_at,
        "Task history retention: purged old rows"
    );
    Ok(true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
