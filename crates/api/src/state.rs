use std::sync::Arc;

use taskhist_core::task_history::{TaskHistoryRecorder, TaskHistoryStore};
use taskhist_db::store::SqlTaskHistoryStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: taskhist_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Task history persistence.
    pub task_history: Arc<dyn TaskHistoryStore>,
    /// Records instrumented runs (cleanup included) into `task_history`.
    pub recorder: TaskHistoryRecorder,
}

impl AppState {
    /// Wire the SQLite-backed task history store and recorder over `pool`.
    pub fn new(pool: taskhist_db::DbPool, config: ServerConfig) -> Self {
        let task_history: Arc<dyn TaskHistoryStore> =
            Arc::new(SqlTaskHistoryStore::new(pool.clone()));
        let recorder = TaskHistoryRecorder::new(Arc::clone(&task_history));
        Self {
            pool,
            config: Arc::new(config),
            task_history,
            recorder,
        }
    }
}
