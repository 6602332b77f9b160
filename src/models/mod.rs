use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// ─── Homework ────────────────────────────────────────────────────────────────

/// One homework entry. `days_left` is a snapshot taken when the record was
/// created or loaded; it does not tick while the app is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homework {
    pub name: String,
    pub due_at: DateTime<Utc>,
    pub days_left: i64,
}

impl Homework {
    pub fn new(name: impl Into<String>, due_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            due_at,
            days_left: days_left(due_at, now),
        }
    }

    pub fn due_millis(&self) -> i64 {
        self.due_at.timestamp_millis()
    }

    /// Due date as a local calendar date, e.g. `Wed Dec 25 2024`.
    pub fn due_label(&self) -> String {
        self.due_at
            .with_timezone(&Local)
            .format("%a %b %d %Y")
            .to_string()
    }
}

/// Whole days between `now` and `due_at`, truncated toward zero.
pub fn days_left(due_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (due_at.timestamp_millis() - now.timestamp_millis()) / MILLIS_PER_DAY
}
