//! Exam timer policy.
//!
//! There is no background timer. The caller samples the wall clock on every
//! render or prompt and asks the clock how much time is left.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Start and deadline of a timed practice exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamClock {
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Timer state at one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerStatus {
    pub remaining_seconds: u64,
    /// Remaining time is below the warning threshold.
    pub low_time: bool,
    pub expired: bool,
}

impl ExamClock {
    /// Start a clock at `now` that runs for `duration_minutes`.
    pub fn start(now: DateTime<Utc>, duration_minutes: u32) -> Self {
        Self {
            started_at: now,
            ends_at: now + Duration::minutes(i64::from(duration_minutes)),
        }
    }

    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        remaining_seconds(self.ends_at, now)
    }

    /// Seconds since the start, never negative.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        (now - self.started_at).num_seconds().max(0) as u64
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_seconds(now) == 0
    }

    pub fn status(&self, now: DateTime<Utc>, low_time_warning_secs: u64) -> TimerStatus {
        let remaining = self.remaining_seconds(now);
        TimerStatus {
            remaining_seconds: remaining,
            low_time: remaining > 0 && remaining < low_time_warning_secs,
            expired: remaining == 0,
        }
    }
}

/// Whole seconds left until `end_time`, clamped at zero.
pub fn remaining_seconds(end_time: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (end_time - now).num_seconds().max(0) as u64
}

/// Format seconds as `MM:SS`; minutes are not wrapped into hours.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
