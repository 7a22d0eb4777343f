//! Domain model for the task lifecycle.
//!
//! The task domain models quick-task and job-task records, their status
//! state machine, logged time, allocation sub-records, and the deliverable
//! capacity pools those allocations are validated against, while keeping
//! all infrastructure concerns outside of the domain boundary.

mod allocation;
mod deliverable;
mod error;
mod ids;
mod status;
mod task;
mod time_entry;

pub use allocation::{Allocation, AllocationPatch, NewAllocation};
pub use deliverable::{Deliverable, ServiceTypePool};
pub use error::{ReadinessGap, TaskDomainError};
pub use ids::{AllocationId, DeliverableId, JobId, TaskId, TimeEntryId};
pub use status::{ParseTaskStatusError, TaskStatus, TransitionEffect};
pub use task::{NewTaskData, Task, TaskPatch};
pub use time_entry::{NewTimeEntry, TimeEntry};
