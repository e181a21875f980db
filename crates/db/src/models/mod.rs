//! Database row models.

pub mod task_history;
