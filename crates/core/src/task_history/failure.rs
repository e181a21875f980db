//! Failure capture: turning an error into structured, persistable data.
//!
//! When wrapped work fails, the recorder stores a [`FailureSummary`] merged
//! into the record's `task_details`:
//!
//! ```json
//! {
//!   "status": "failed",
//!   "exception": "my_crate::sync::SyncError",
//!   "message": "connection refused",
//!   "stacktrace": ["caused by: ..."],
//!   "ex-data": {"host": "db-1"},
//!   "original-info": {"tables": 12}
//! }
//! ```

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::redaction::{redact_sensitive_fields, sanitize_trace_line};

/// Maximum number of cause entries kept in a stacktrace.
pub const MAX_TRACE_FRAMES: usize = 50;

/// `exception` recorded when the wrapped work panics.
pub const PANIC_EXCEPTION: &str = "panic";

/// Text of a panic payload. `panic!` produces either a `&'static str` or a
/// `String`; anything else is opaque.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Status written into the details of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Failed,
}

// ---------------------------------------------------------------------------
// Structured task error
// ---------------------------------------------------------------------------

/// An error carrying a structured JSON data map.
///
/// Return (or wrap as a source) a `TaskError` from task code to have its
/// data persisted under `ex-data` when the run fails.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TaskError {
    message: String,
    data: serde_json::Value,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TaskError {
    pub fn new(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            data,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }
}

// ---------------------------------------------------------------------------
// Failure summary
// ---------------------------------------------------------------------------

/// Structured description of a failed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureSummary {
    pub status: TaskStatus,
    /// Type name of the error returned by the work.
    pub exception: String,
    pub message: String,
    /// Sanitized cause chain, outermost cause first.
    pub stacktrace: Vec<String>,
    #[serde(rename = "ex-data")]
    pub ex_data: Option<serde_json::Value>,
    /// The caller's `task_details` as supplied before the failure.
    #[serde(rename = "original-info")]
    pub original_info: Option<serde_json::Value>,
}

impl FailureSummary {
    /// Summarize `err` without consuming it.
    pub fn capture<E>(err: &E, original_info: Option<serde_json::Value>) -> Self
    where
        E: std::error::Error + 'static,
    {
        Self::from_error(err, std::any::type_name::<E>(), original_info)
    }

    /// Summarize an [`anyhow::Error`]. The message is the outermost context;
    /// the stacktrace walks the wrapped causes.
    pub fn capture_anyhow(err: &anyhow::Error, original_info: Option<serde_json::Value>) -> Self {
        let top: &(dyn std::error::Error + Send + Sync + 'static) = err.as_ref();
        Self::from_error(top, std::any::type_name::<anyhow::Error>(), original_info)
    }

    /// Summarize a panic payload caught from the wrapped work.
    pub fn from_panic(
        payload: &(dyn Any + Send),
        original_info: Option<serde_json::Value>,
    ) -> Self {
        Self {
            status: TaskStatus::Failed,
            exception: PANIC_EXCEPTION.to_string(),
            message: sanitize_trace_line(&panic_message(payload)),
            stacktrace: Vec::new(),
            ex_data: None,
            original_info,
        }
    }

    fn from_error(
        top: &(dyn std::error::Error + 'static),
        exception: &str,
        original_info: Option<serde_json::Value>,
    ) -> Self {
        let stacktrace = std::iter::successors(top.source(), |cause| cause.source())
            .take(MAX_TRACE_FRAMES)
            .map(|cause| sanitize_trace_line(&format!("caused by: {cause}")))
            .collect();

        let ex_data = std::iter::successors(Some(top), |e| e.source())
            .find_map(|e| e.downcast_ref::<TaskError>())
            .map(|task_err| redact_sensitive_fields(task_err.data()));

        Self {
            status: TaskStatus::Failed,
            exception: exception.to_string(),
            message: top.to_string(),
            stacktrace,
            ex_data,
            original_info,
        }
    }

    /// Build the details stored for a failed run: the caller's map (when it
    /// is a JSON object) with every summary key merged over it.
    pub fn into_task_details(self) -> serde_json::Value {
        let mut merged = match &self.original_info {
            Some(serde_json::Value::Object(map)) => map.clone(),
            _ => serde_json::Map::new(),
        };
        if let Ok(serde_json::Value::Object(summary)) = serde_json::to_value(&self) {
            merged.extend(summary);
        }
        serde_json::Value::Object(merged)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, thiserror::Error)]
    #[error("sync failed")]
    struct SyncError {
        #[source]
        source: std::io::Error,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("plain failure")]
    struct PlainError;

    #[test]
    fn captures_type_name_and_message() {
        let summary = FailureSummary::capture(&PlainError, None);
        assert_eq!(summary.status, TaskStatus::Failed);
        assert!(summary.exception.ends_with("PlainError"));
        assert_eq!(summary.message, "plain failure");
        assert!(summary.stacktrace.is_empty());
        assert_eq!(summary.ex_data, None);
    }

    #[test]
    fn stacktrace_follows_source_chain_and_strips_paths() {
        let err = SyncError {
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "missing /srv/app/data/state.json",
            ),
        };
        let summary = FailureSummary::capture(&err, None);
        assert_eq!(summary.stacktrace, vec!["caused by: missing [path]".to_string()]);
    }

    #[test]
    fn ex_data_comes_from_task_error_and_is_redacted() {
        let err = TaskError::new("upstream refused", json!({"host": "db-1", "password": "pw"}));
        let summary = FailureSummary::capture(&err, None);
        assert_eq!(
            summary.ex_data,
            Some(json!({"host": "db-1", "password": "[REDACTED]"}))
        );
    }

    #[test]
    fn ex_data_found_deeper_in_the_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer(#[source] TaskError);

        let err = Outer(TaskError::new("inner", json!({"attempt": 3})));
        let summary = FailureSummary::capture(&err, None);
        assert_eq!(summary.ex_data, Some(json!({"attempt": 3})));
        assert_eq!(summary.stacktrace, vec!["caused by: inner".to_string()]);
    }

    #[test]
    fn stacktrace_is_capped() {
        let mut err = TaskError::new("level-0", json!(null));
        for i in 1..(MAX_TRACE_FRAMES + 10) {
            err = TaskError::new(format!("level-{i}"), json!(null)).with_source(err);
        }
        let summary = FailureSummary::capture(&err, None);
        assert_eq!(summary.stacktrace.len(), MAX_TRACE_FRAMES);
    }

    #[test]
    fn task_details_merge_original_map_with_summary_keys() {
        let original = json!({"tables": 12, "status": "running"});
        let details = FailureSummary::capture(&PlainError, Some(original.clone())).into_task_details();

        assert_eq!(details["tables"], 12);
        assert_eq!(details["status"], "failed");
        assert_eq!(details["message"], "plain failure");
        assert_eq!(details["original-info"], original);
        assert!(details["stacktrace"].is_array());
        assert!(details.get("ex-data").is_some());
        assert!(details["exception"].as_str().unwrap().ends_with("PlainError"));
    }

    #[test]
    fn anyhow_error_uses_outer_context_and_finds_task_error() {
        let err = anyhow::Error::new(TaskError::new("pool refused", json!({"token": "t", "pool": 4})))
            .context("syncing database 7");
        let summary = FailureSummary::capture_anyhow(&err, None);

        assert_eq!(summary.exception, "anyhow::Error");
        assert_eq!(summary.message, "syncing database 7");
        assert_eq!(summary.stacktrace, vec!["caused by: pool refused".to_string()]);
        assert_eq!(summary.ex_data, Some(json!({"token": "[REDACTED]", "pool": 4})));
    }

    #[test]
    fn panic_payloads_are_summarized() {
        let from_str: Box<dyn Any + Send> = Box::new("boom");
        let from_string: Box<dyn Any + Send> = Box::new(format!("bad row {}", 3));
        let opaque: Box<dyn Any + Send> = Box::new(17_u8);

        let summary = FailureSummary::from_panic(from_str.as_ref(), Some(json!({"a": 1})));
        assert_eq!(summary.exception, PANIC_EXCEPTION);
        assert_eq!(summary.message, "boom");
        assert_eq!(summary.original_info, Some(json!({"a": 1})));

        assert_eq!(panic_message(from_string.as_ref()), "bad row 3");
        assert_eq!(panic_message(opaque.as_ref()), "Box<dyn Any>");
    }

    #[test]
    fn task_details_without_original_info() {
        let details = FailureSummary::capture(&PlainError, None).into_task_details();
        assert_eq!(details["status"], "failed");
        assert_eq!(details["original-info"], serde_json::Value::Null);
        assert_eq!(details["ex-data"], serde_json::Value::Null);
    }
}
