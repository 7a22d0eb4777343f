//! Task status vocabulary and transition-effect table.
//!
//! The original application compared raw status strings at every call site;
//! here the vocabulary is a closed enumeration and the completion-date side
//! effects of moving between statuses are recorded in one table that every
//! caller consumes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle status shared by tasks and deliverables.
///
/// Every pairwise transition is permitted; `Completed` is not terminal
/// (reopening clears the completion date) and archival is tracked as a
/// separate one-way flag on the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Queued, not being worked.
    Backlog,
    /// Actively being worked.
    InProgress,
    /// Finished, with a confirmed completion date.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns the completion-date side effect of moving from `self` to `to`.
    #[must_use]
    pub const fn transition_effect(self, to: Self) -> TransitionEffect {
        match (self, to) {
            (_, Self::Completed) => TransitionEffect::SetCompletionDate,
            (Self::Completed, _) => TransitionEffect::ClearCompletionDate,
            _ => TransitionEffect::None,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Side effect a status transition has on the task's completion date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    /// No completion-date change.
    None,
    /// Entering `completed`: the completion date must be set (caller-supplied
    /// or today, never in the future).
    SetCompletionDate,
    /// Leaving `completed`: the completion date is cleared.
    ClearCompletionDate,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
