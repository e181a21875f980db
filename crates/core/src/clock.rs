//! Wall-clock abstraction.
//!
//! The recorder samples `now()` on entry and exit of the wrapped work. Tests
//! swap in [`FixedClock`] or [`SteppingClock`] to get deterministic
//! timestamps.

use std::sync::Mutex;

use chrono::{Duration, Utc};

use crate::types::Timestamp;

/// Source of the current UTC instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Production clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: Timestamp,
}

impl FixedClock {
    pub fn new(at: Timestamp) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.at
    }
}

/// Returns `start`, then advances by `step` on every call.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<Timestamp>,
    step: Duration,
}

impl SteppingClock {
    pub fn new(start: Timestamp, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Timestamp {
        let mut next = self.next.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let current = *next;
        *next = current + self.step;
        current
    }
}
