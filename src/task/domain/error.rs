//! Error types for task domain validation and business-rule guards.

use super::ids::{AllocationId, DeliverableId, TaskId};
use crate::workspace::domain::ServiceTypeId;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// An external task must reference a company.
    #[error("external tasks must reference a company")]
    CompanyRequired,

    /// Logged hours must be positive.
    #[error("time entry hours must be greater than zero, got {0}")]
    InvalidTimeEntryHours(f64),

    /// A completion date later than today was supplied.
    #[error("completion date {requested} is after today ({today})")]
    CompletionDateInFuture {
        /// Date the caller asked to record.
        requested: NaiveDate,
        /// Current date according to the clock.
        today: NaiveDate,
    },

    /// The deletion guard rejected the task.
    #[error("cannot delete completed tasks or tasks with time")]
    DeleteBlocked(TaskId),

    /// Archival requires the task to be completed first.
    #[error("task {0} cannot be archived before it is completed")]
    ArchiveRequiresCompletion(TaskId),

    /// A readiness-gated transition was attempted on an unready job task.
    #[error("task {task_id} is not ready to be scheduled")]
    NotReady {
        /// Task that failed the readiness check.
        task_id: TaskId,
        /// Everything still missing or invalid.
        gaps: Vec<ReadinessGap>,
    },

    /// The referenced allocation does not exist on the task.
    #[error("allocation {allocation_id} not found on task {task_id}")]
    AllocationNotFound {
        /// Task that was patched.
        task_id: TaskId,
        /// Allocation id that did not match.
        allocation_id: AllocationId,
    },

    /// The task has already been promoted to a job task.
    #[error("task {0} is already attached to a job")]
    AlreadyJobTask(TaskId),

    /// The deliverable's pools do not cover the requested service type.
    #[error("deliverable {deliverable_id} has no pool for service type {service_type_id}")]
    ServiceTypeNotInPools {
        /// Destination deliverable.
        deliverable_id: DeliverableId,
        /// Service type with no matching pool.
        service_type_id: ServiceTypeId,
    },
}

/// One reason a task fails the readiness predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessGap {
    /// Title is empty.
    EmptyTitle,
    /// Description is missing or empty.
    EmptyDescription,
    /// No due date set.
    MissingDueDate,
    /// The task has no allocations at all.
    NoAllocations,
    /// An allocation has no assignee.
    MissingAssignee(AllocationId),
    /// An allocation has no service type.
    MissingServiceType(AllocationId),
    /// An allocation's LOE hours are not positive.
    NonPositiveLoe(AllocationId),
    /// An allocation's service type has no pool on the owning deliverable.
    UnsupportedServiceType(AllocationId, ServiceTypeId),
}
