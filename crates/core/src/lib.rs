//! Task history core.
//!
//! Domain types and the three pieces of real logic behind the task history
//! audit trail: the instrumented-execution wrapper ([`task_history::recorder`]),
//! the row-count retention routine ([`task_history::retention`]) and the
//! permission policy guarding read/write access ([`permissions`]).
//!
//! This crate has no storage dependency. Persistence goes through the
//! [`task_history::TaskHistoryStore`] trait, implemented by `taskhist-db`
//! (SQLite) and by [`task_history::memory::MemoryTaskHistoryStore`].

pub mod clock;
pub mod error;
pub mod pagination;
pub mod permissions;
pub mod redaction;
pub mod task_history;
pub mod types;
