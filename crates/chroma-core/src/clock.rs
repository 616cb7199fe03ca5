//! Wall-clock abstraction used to stamp uploads.
//!
//! Every upload derives its filenames from a single timestamp taken at ingestion.
//! Handlers receive the clock through application state so tests can pin time.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Format of the filename prefix: fixed width, lexically sortable, microsecond resolution.
pub const UPLOAD_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests.
///
/// Each call to `now` returns the current instant and then advances it by `step`,
/// so consecutive uploads never share a timestamp unless `step` is zero.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            step,
        }
    }

    /// Clock that always returns `at`.
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::new(at, Duration::zero())
    }

    pub fn set(&self, at: DateTime<Utc>) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let now = *current;
        *current = now + self.step;
        now
    }
}

/// Render the filename prefix for an upload taken at `at`.
pub fn upload_timestamp(at: DateTime<Utc>) -> String {
    at.format(UPLOAD_TIMESTAMP_FORMAT).to_string()
}
