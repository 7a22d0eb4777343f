//! Logged-time records attached to a task.

use super::ids::TimeEntryId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One logged block of time against a task.
///
/// Entries are append-only: the store exposes no edit or delete operation,
/// and the presence of any entry blocks task deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    /// Entry identifier.
    pub id: TimeEntryId,
    /// Calendar day the time was worked.
    pub date: NaiveDate,
    /// Hours worked; always positive.
    pub hours: f64,
    /// Optional free-text note.
    pub note: Option<String>,
}

/// Payload for appending a time entry; the entry id is generated on append.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimeEntry {
    /// Calendar day the time was worked.
    pub date: NaiveDate,
    /// Hours worked; must be positive.
    pub hours: f64,
    /// Optional free-text note.
    pub note: Option<String>,
}

impl NewTimeEntry {
    /// Creates a payload for the given day and hours.
    #[must_use]
    pub const fn new(date: NaiveDate, hours: f64) -> Self {
        Self {
            date,
            hours,
            note: None,
        }
    }

    /// Attaches a note to the entry.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
