//! Task aggregate root: quick tasks and job tasks share one shape,
//! distinguished by the presence of a job/deliverable attachment.

use super::allocation::{Allocation, AllocationPatch, NewAllocation};
use super::deliverable::Deliverable;
use super::error::{ReadinessGap, TaskDomainError};
use super::ids::{AllocationId, DeliverableId, JobId, TaskId, TimeEntryId};
use super::status::{TaskStatus, TransitionEffect};
use super::time_entry::{NewTimeEntry, TimeEntry};
use crate::workspace::domain::{CompanyId, PersonId, ServiceTypeId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// Guards live here rather than in the callers: deletion, archival,
/// completion-date consistency, and readiness are all decided by the
/// aggregate so that every entry point (list view, kanban board, drawer)
/// gets identical behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    completed_at: Option<NaiveDate>,
    service_type_id: Option<ServiceTypeId>,
    loe_hours: Option<f64>,
    assignee_user_id: Option<UserId>,
    assignor_user_id: Option<UserId>,
    is_internal: bool,
    company_id: Option<CompanyId>,
    person_id: Option<PersonId>,
    is_archived: bool,
    job_id: Option<JobId>,
    deliverable_id: Option<DeliverableId>,
    time_entries: Vec<TimeEntry>,
    allocations: Vec<Allocation>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for constructing a new task with resolved defaults.
///
/// The service layer resolves assignee/assignor defaulting against the
/// workspace context before handing the data to the aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskData {
    /// Task title; must be non-empty after trimming.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Initial status.
    pub status: TaskStatus,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Service type, when already chosen.
    pub service_type_id: Option<ServiceTypeId>,
    /// Level-of-effort estimate in hours.
    pub loe_hours: Option<f64>,
    /// Resolved assignee.
    pub assignee_user_id: Option<UserId>,
    /// Resolved assignor.
    pub assignor_user_id: Option<UserId>,
    /// Whether the task is internal to the workspace.
    pub is_internal: bool,
    /// Company reference; required when the task is not internal.
    pub company_id: Option<CompanyId>,
    /// Optional person at the company.
    pub person_id: Option<PersonId>,
}

/// Field patch for an existing task.
///
/// The outer `Option` distinguishes "leave unchanged" from "set"; the inner
/// `Option` on nullable fields distinguishes "set to a value" from "clear".
/// Status is deliberately absent: status changes go through
/// [`Task::set_status`] so the transition table cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskPatch {
    /// New title; must be non-empty after trimming.
    pub title: Option<String>,
    /// New description, or `Some(None)` to clear it.
    pub description: Option<Option<String>>,
    /// New due date, or `Some(None)` to clear it.
    pub due_date: Option<Option<NaiveDate>>,
    /// New service type, or `Some(None)` to clear it.
    pub service_type_id: Option<Option<ServiceTypeId>>,
    /// New LOE estimate, or `Some(None)` to clear it.
    pub loe_hours: Option<Option<f64>>,
    /// New assignee, or `Some(None)` to clear it.
    pub assignee_user_id: Option<Option<UserId>>,
    /// New assignor, or `Some(None)` to clear it.
    pub assignor_user_id: Option<Option<UserId>>,
    /// New internal/external flag.
    pub is_internal: Option<bool>,
    /// New company reference, or `Some(None)` to clear it.
    pub company_id: Option<Option<CompanyId>>,
    /// New person reference, or `Some(None)` to clear it.
    pub person_id: Option<Option<PersonId>>,
}

impl Task {
    /// Creates a new task from resolved creation data.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank and
    /// [`TaskDomainError::CompanyRequired`] when an external task carries no
    /// company reference.
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = validated_title(&data.title)?;
        validate_company(data.is_internal, data.company_id)?;

        let timestamp = clock.utc();
        // A caller-specified initial status may be Completed; the completion
        // date must track the status from the very first write.
        let completed_at = match data.status {
            TaskStatus::Completed => Some(timestamp.date_naive()),
            TaskStatus::Backlog | TaskStatus::InProgress => None,
        };
        Ok(Self {
            id: TaskId::new(),
            title,
            description: data.description,
            status: data.status,
            due_date: data.due_date,
            completed_at,
            service_type_id: data.service_type_id,
            loe_hours: data.loe_hours,
            assignee_user_id: data.assignee_user_id,
            assignor_user_id: data.assignor_user_id,
            is_internal: data.is_internal,
            company_id: data.company_id,
            person_id: data.person_id,
            is_archived: false,
            job_id: None,
            deliverable_id: None,
            time_entries: Vec::new(),
            allocations: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the completion date; `Some` iff the status is `Completed`.
    #[must_use]
    pub const fn completed_at(&self) -> Option<NaiveDate> {
        self.completed_at
    }

    /// Returns the task-level service type, if any.
    #[must_use]
    pub const fn service_type_id(&self) -> Option<ServiceTypeId> {
        self.service_type_id
    }

    /// Returns the task-level LOE estimate, if any.
    #[must_use]
    pub const fn loe_hours(&self) -> Option<f64> {
        self.loe_hours
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_user_id(&self) -> Option<UserId> {
        self.assignee_user_id
    }

    /// Returns the assignor, if any.
    #[must_use]
    pub const fn assignor_user_id(&self) -> Option<UserId> {
        self.assignor_user_id
    }

    /// Returns whether the task is internal to the workspace.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        self.is_internal
    }

    /// Returns the company reference, if any.
    #[must_use]
    pub const fn company_id(&self) -> Option<CompanyId> {
        self.company_id
    }

    /// Returns the person reference, if any.
    #[must_use]
    pub const fn person_id(&self) -> Option<PersonId> {
        self.person_id
    }

    /// Returns whether the task has been archived.
    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.is_archived
    }

    /// Returns the owning job, if promoted.
    #[must_use]
    pub const fn job_id(&self) -> Option<JobId> {
        self.job_id
    }

    /// Returns the owning deliverable, if promoted.
    #[must_use]
    pub const fn deliverable_id(&self) -> Option<DeliverableId> {
        self.deliverable_id
    }

    /// Returns the logged time entries, oldest first.
    #[must_use]
    pub fn time_entries(&self) -> &[TimeEntry] {
        &self.time_entries
    }

    /// Returns the allocation records.
    #[must_use]
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the task is a quick task (not attached to a job).
    #[must_use]
    pub const fn is_quick_task(&self) -> bool {
        self.job_id.is_none() && self.deliverable_id.is_none()
    }

    /// Returns the sum of all logged hours.
    #[must_use]
    pub fn actual_hours(&self) -> f64 {
        self.time_entries.iter().map(|entry| entry.hours).sum()
    }

    /// Returns whether the deletion guard permits deleting this task.
    ///
    /// Deletion is blocked once the task is completed or has any logged
    /// time.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.status != TaskStatus::Completed && self.time_entries.is_empty()
    }

    /// Applies a field patch.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title and
    /// [`TaskDomainError::CompanyRequired`] when the patched task would be
    /// external without a company reference.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let title = match patch.title {
            Some(raw) => Some(validated_title(&raw)?),
            None => None,
        };
        let is_internal = patch.is_internal.unwrap_or(self.is_internal);
        let company_id = patch.company_id.unwrap_or(self.company_id);
        validate_company(is_internal, company_id)?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(service_type_id) = patch.service_type_id {
            self.service_type_id = service_type_id;
        }
        if let Some(loe_hours) = patch.loe_hours {
            self.loe_hours = loe_hours;
        }
        if let Some(assignee) = patch.assignee_user_id {
            self.assignee_user_id = assignee;
        }
        if let Some(assignor) = patch.assignor_user_id {
            self.assignor_user_id = assignor;
        }
        self.is_internal = is_internal;
        self.company_id = company_id;
        if let Some(person_id) = patch.person_id {
            self.person_id = person_id;
        }
        self.touch(clock);
        Ok(())
    }

    /// Moves the task to a new status, applying the transition-effect table.
    ///
    /// Entering `Completed` records `completed_on` (or today when absent);
    /// leaving `Completed` clears the completion date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CompletionDateInFuture`] when the supplied
    /// completion date is after today.
    pub fn set_status(
        &mut self,
        to: TaskStatus,
        completed_on: Option<NaiveDate>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        match self.status.transition_effect(to) {
            TransitionEffect::SetCompletionDate => {
                let today = clock.utc().date_naive();
                let date = completed_on.unwrap_or(today);
                if date > today {
                    return Err(TaskDomainError::CompletionDateInFuture {
                        requested: date,
                        today,
                    });
                }
                self.completed_at = Some(date);
            }
            TransitionEffect::ClearCompletionDate => {
                self.completed_at = None;
            }
            TransitionEffect::None => {}
        }
        self.status = to;
        self.touch(clock);
        Ok(())
    }

    /// Marks the task archived.
    ///
    /// Archival is a one-way soft delete and only applies to completed
    /// tasks; the guard lives here rather than in the menu that exposes the
    /// action.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ArchiveRequiresCompletion`] when the task
    /// is not completed.
    pub fn archive(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::Completed {
            return Err(TaskDomainError::ArchiveRequiresCompletion(self.id));
        }
        self.is_archived = true;
        self.touch(clock);
        Ok(())
    }

    /// Appends a time entry with a generated id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTimeEntryHours`] when `hours` is not
    /// positive.
    pub fn add_time_entry(
        &mut self,
        entry: NewTimeEntry,
        clock: &impl Clock,
    ) -> Result<TimeEntryId, TaskDomainError> {
        // Written as a negated comparison so NaN counts as non-positive.
        if !(entry.hours > 0.0) {
            return Err(TaskDomainError::InvalidTimeEntryHours(entry.hours));
        }
        let id = TimeEntryId::new();
        self.time_entries.push(TimeEntry {
            id,
            date: entry.date,
            hours: entry.hours,
            note: entry.note,
        });
        self.touch(clock);
        Ok(id)
    }

    /// Appends an allocation with a generated id. Unconditional; allocations
    /// are validated at readiness time.
    pub fn add_allocation(&mut self, new: NewAllocation, clock: &impl Clock) -> AllocationId {
        let allocation = Allocation::from_new(new);
        let id = allocation.id;
        self.allocations.push(allocation);
        self.touch(clock);
        id
    }

    /// Patches an existing allocation by id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AllocationNotFound`] when no allocation
    /// matches.
    pub fn update_allocation(
        &mut self,
        allocation_id: AllocationId,
        patch: AllocationPatch,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let allocation = self
            .allocations
            .iter_mut()
            .find(|alloc| alloc.id == allocation_id)
            .ok_or(TaskDomainError::AllocationNotFound {
                task_id: self.id,
                allocation_id,
            })?;
        allocation.apply_patch(patch);
        self.touch(clock);
        Ok(())
    }

    /// Removes an allocation by id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AllocationNotFound`] when no allocation
    /// matches.
    pub fn remove_allocation(
        &mut self,
        allocation_id: AllocationId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let before = self.allocations.len();
        self.allocations.retain(|alloc| alloc.id != allocation_id);
        if self.allocations.len() == before {
            return Err(TaskDomainError::AllocationNotFound {
                task_id: self.id,
                allocation_id,
            });
        }
        self.touch(clock);
        Ok(())
    }

    /// Attaches the task to a job and deliverable, optionally remapping the
    /// service type.
    ///
    /// The task keeps its id and history; it simply stops matching the
    /// quick-task filter. Pool coverage is checked by the service, which has
    /// the destination deliverable in hand.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyJobTask`] when the task is already
    /// attached to a job.
    pub fn promote(
        &mut self,
        job_id: JobId,
        deliverable_id: DeliverableId,
        service_type_remap: Option<ServiceTypeId>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.job_id.is_some() || self.deliverable_id.is_some() {
            return Err(TaskDomainError::AlreadyJobTask(self.id));
        }
        self.job_id = Some(job_id);
        self.deliverable_id = Some(deliverable_id);
        if let Some(remap) = service_type_remap {
            self.service_type_id = Some(remap);
        }
        self.touch(clock);
        Ok(())
    }

    /// Collects everything preventing this task from being schedulable
    /// against the given deliverable.
    ///
    /// Readiness requires a title, description, due date, at least one
    /// allocation, and every allocation fully specified with a service type
    /// the deliverable has a pool for.
    #[must_use]
    pub fn readiness_gaps(&self, deliverable: &Deliverable) -> Vec<ReadinessGap> {
        let mut gaps = Vec::new();
        if self.title.trim().is_empty() {
            gaps.push(ReadinessGap::EmptyTitle);
        }
        if self
            .description
            .as_deref()
            .is_none_or(|text| text.trim().is_empty())
        {
            gaps.push(ReadinessGap::EmptyDescription);
        }
        if self.due_date.is_none() {
            gaps.push(ReadinessGap::MissingDueDate);
        }
        if self.allocations.is_empty() {
            gaps.push(ReadinessGap::NoAllocations);
        }
        for allocation in &self.allocations {
            if allocation.assignee_user_id.is_none() {
                gaps.push(ReadinessGap::MissingAssignee(allocation.id));
            }
            match allocation.service_type_id {
                None => gaps.push(ReadinessGap::MissingServiceType(allocation.id)),
                Some(service_type_id) => {
                    if !deliverable.supports_service_type(service_type_id) {
                        gaps.push(ReadinessGap::UnsupportedServiceType(
                            allocation.id,
                            service_type_id,
                        ));
                    }
                }
            }
            // Negated comparison so a NaN LOE counts as non-positive.
            if !(allocation.loe_hours > 0.0) {
                gaps.push(ReadinessGap::NonPositiveLoe(allocation.id));
            }
        }
        gaps
    }

    /// Returns whether the task is ready to be scheduled on the deliverable.
    #[must_use]
    pub fn is_ready(&self, deliverable: &Deliverable) -> bool {
        self.readiness_gaps(deliverable).is_empty()
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

/// Validates and normalizes a task title.
fn validated_title(raw: &str) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

/// External tasks must carry a company reference.
const fn validate_company(
    is_internal: bool,
    company_id: Option<CompanyId>,
) -> Result<(), TaskDomainError> {
    if !is_internal && company_id.is_none() {
        return Err(TaskDomainError::CompanyRequired);
    }
    Ok(())
}
