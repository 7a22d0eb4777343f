//! Identifier newtypes for the task context.

use crate::workspace::domain::define_id;

define_id! {
    /// Unique identifier for a task record.
    TaskId
}

define_id! {
    /// Unique identifier for a time entry on a task.
    TimeEntryId
}

define_id! {
    /// Unique identifier for an allocation on a job task.
    AllocationId
}

define_id! {
    /// Unique identifier for a job.
    JobId
}

define_id! {
    /// Unique identifier for a deliverable within a job.
    DeliverableId
}
