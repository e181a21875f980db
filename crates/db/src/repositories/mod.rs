//! Zero-sized repositories with async query methods.

pub mod task_history_repo;

pub use task_history_repo::TaskHistoryRepo;
