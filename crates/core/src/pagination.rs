//! Validation helpers for `?limit=&offset=` pagination parameters.
//!
//! Both parameters are optional and independent: `None` means "not
//! supplied" and is passed through untouched so the store applies no limit
//! (or no offset) at all.

use crate::error::CoreError;

/// A supplied limit must be strictly positive.
pub fn validate_limit(limit: Option<i64>) -> Result<Option<i64>, CoreError> {
    match limit {
        Some(l) if l < 1 => Err(CoreError::Validation(format!(
            "limit must be a positive integer, got {l}"
        ))),
        other => Ok(other),
    }
}

/// A supplied offset must be non-negative.
pub fn validate_offset(offset: Option<i64>) -> Result<Option<i64>, CoreError> {
    match offset {
        Some(o) if o < 0 => Err(CoreError::Validation(format!(
            "offset must be a non-negative integer, got {o}"
        ))),
        other => Ok(other),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
