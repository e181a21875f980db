//! Scrubbing helpers applied to failure details before they are persisted.
//!
//! Failure summaries end up in a table that monitoring users can read, so
//! secrets in structured error context and filesystem layout in error
//! messages are removed on the way in.

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Fields that should be redacted from structured failure context.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "secret",
    "access_token",
    "refresh_token",
    "api_key",
    "private_key",
    "authorization",
    "credential",
    "session_token",
];

/// Replacement value for redacted fields.
pub const REDACTED: &str = "[REDACTED]";

/// Redact sensitive fields from a JSON value, recursing into nested objects
/// and arrays.
///
/// Replaces the value of any key containing one of [`SENSITIVE_FIELDS`]
/// (case-insensitive) with `"[REDACTED]"`.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(key.clone(), serde_json::Value::String(REDACTED.to_string()));
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Trace line sanitization
// ---------------------------------------------------------------------------

/// Maximum length (in characters) of a single sanitized trace entry.
pub const MAX_TRACE_LINE_LEN: usize = 500;

/// Placeholder substituted for absolute filesystem paths.
pub const PATH_PLACEHOLDER: &str = "[path]";

/// Absolute Unix (`/a/b/c`) or Windows (`C:\a\b`) paths with at least one
/// directory component.
static ABSOLUTE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[A-Za-z]:\\|/)(?:[\w.\-]+[/\\])+[\w.\-]*").expect("valid regex")
});

/// Sanitize one line of a failure trace: strip absolute paths and cap the
/// length at [`MAX_TRACE_LINE_LEN`] characters.
pub fn sanitize_trace_line(line: &str) -> String {
    let scrubbed = ABSOLUTE_PATH_RE.replace_all(line, PATH_PLACEHOLDER);
    if scrubbed.chars().count() <= MAX_TRACE_LINE_LEN {
        return scrubbed.into_owned();
    }
    let mut truncated: String = scrubbed.chars().take(MAX_TRACE_LINE_LEN).collect();
    truncated.push('…');
    truncated
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- redact_sensitive_fields ---------------------------------------------

    #[test]
    fn redacts_password_field() {
        let input = json!({"username": "alice", "password": "s3cret"});
        let result = redact_sensitive_fields(&input);
        assert_eq!(result["username"], "alice");
        assert_eq!(result["password"], REDACTED);
    }

    #[test]
    fn redacts_case_insensitive_and_partial_keys() {
        let input = json!({"DB_Password": "x", "upstream_api_key": "y", "host": "db"});
        let result = redact_sensitive_fields(&input);
        assert_eq!(result["DB_Password"], REDACTED);
        assert_eq!(result["upstream_api_key"], REDACTED);
        assert_eq!(result["host"], "db");
    }

    #[test]
    fn redacts_nested_objects_and_arrays() {
        let input = json!({
            "connection": {"token": "abc", "port": 5432},
            "attempts": [{"secret": "1"}, {"ok": true}]
        });
        let result = redact_sensitive_fields(&input);
        assert_eq!(result["connection"]["token"], REDACTED);
        assert_eq!(result["connection"]["port"], 5432);
        assert_eq!(result["attempts"][0]["secret"], REDACTED);
        assert_eq!(result["attempts"][1]["ok"], true);
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(redact_sensitive_fields(&json!(42)), json!(42));
        assert_eq!(redact_sensitive_fields(&json!(null)), json!(null));
    }

    // -- sanitize_trace_line -------------------------------------------------

    #[test]
    fn strips_unix_paths() {
        let line = "failed to open /var/lib/app/secrets.db: permission denied";
        assert_eq!(
            sanitize_trace_line(line),
            "failed to open [path]: permission denied"
        );
    }

    #[test]
    fn strips_windows_paths() {
        let line = r"cannot read C:\Users\me\config.toml";
        assert_eq!(sanitize_trace_line(line), "cannot read [path]");
    }

    #[test]
    fn leaves_plain_messages_alone() {
        let line = "connection reset by peer";
        assert_eq!(sanitize_trace_line(line), line);
    }

    #[test]
    fn truncates_long_lines() {
        let line = "x".repeat(MAX_TRACE_LINE_LEN + 100);
        let sanitized = sanitize_trace_line(&line);
        assert_eq!(sanitized.chars().count(), MAX_TRACE_LINE_LEN + 1);
        assert!(sanitized.ends_with('…'));
    }
}
