pub mod task_history;
