//! Task store service: every task mutation and query goes through here.
//!
//! The service is stateless over the blob port. Each call loads the
//! workspace's task collection, applies the change through the domain
//! aggregate, and writes the whole collection back (write-through,
//! last-write-wins — the original application persisted entire collections
//! per mutation and this keeps that granularity). Business-rule guards are
//! centralized in the domain and here, so list views, kanban boards, and
//! drawers all get identical behaviour.

use crate::task::domain::{
    AllocationId, AllocationPatch, Deliverable, DeliverableId, JobId, NewAllocation, NewTaskData,
    NewTimeEntry, ServiceTypePool, Task, TaskDomainError, TaskId, TaskPatch, TaskStatus,
};
use crate::workspace::context::WorkspaceContext;
use crate::workspace::domain::{CompanyId, PersonId, ServiceTypeId, UserId};
use crate::workspace::ports::{BlobKey, BlobStore, Collection, StorageError};
use chrono::NaiveDate;
use mockable::Clock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Errors returned by the task store service.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// A domain guard or validation rejected the operation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Persistence failed. Never swallowed: the in-memory change is
    /// discarded and the caller decides whether to retry or warn.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// No task with the given id exists in the workspace.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// No deliverable with the given id exists in the workspace.
    #[error("deliverable not found: {0}")]
    DeliverableNotFound(DeliverableId),

    /// The deliverable belongs to a different job than the one requested.
    #[error("deliverable {deliverable_id} does not belong to job {job_id}")]
    DeliverableJobMismatch {
        /// Deliverable named in the request.
        deliverable_id: DeliverableId,
        /// Job named in the request.
        job_id: JobId,
    },

    /// A stored collection could not be decoded into domain records.
    #[error("stored {collection} collection could not be decoded: {source}")]
    Decode {
        /// Collection that failed to decode.
        collection: &'static str,
        /// Underlying decode failure.
        source: serde_json::Error,
    },
}

/// Request payload for creating a task.
///
/// Quick-created tasks default to `in_progress`; assignee and assignor
/// default from the workspace context at call time.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    due_date: Option<NaiveDate>,
    service_type_id: Option<ServiceTypeId>,
    loe_hours: Option<f64>,
    assignee_user_id: Option<UserId>,
    assignor_user_id: Option<UserId>,
    is_internal: bool,
    company_id: Option<CompanyId>,
    person_id: Option<PersonId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
            due_date: None,
            service_type_id: None,
            loe_hours: None,
            assignee_user_id: None,
            assignor_user_id: None,
            is_internal: true,
            company_id: None,
            person_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets an explicit initial status instead of the `in_progress` default.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the service type.
    #[must_use]
    pub const fn with_service_type(mut self, service_type_id: ServiceTypeId) -> Self {
        self.service_type_id = Some(service_type_id);
        self
    }

    /// Sets the LOE estimate in hours.
    #[must_use]
    pub const fn with_loe_hours(mut self, loe_hours: f64) -> Self {
        self.loe_hours = Some(loe_hours);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_user_id: UserId) -> Self {
        self.assignee_user_id = Some(assignee_user_id);
        self
    }

    /// Sets the assignor.
    #[must_use]
    pub const fn with_assignor(mut self, assignor_user_id: UserId) -> Self {
        self.assignor_user_id = Some(assignor_user_id);
        self
    }

    /// Marks the task external, referencing the given company and optional
    /// person.
    #[must_use]
    pub const fn for_company(mut self, company_id: CompanyId, person_id: Option<PersonId>) -> Self {
        self.is_internal = false;
        self.company_id = Some(company_id);
        self.person_id = person_id;
        self
    }
}

/// Request payload for promoting a quick task into a job.
///
/// Both target ids are required by construction, so a promotion can never
/// half-specify its destination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromoteToJobTaskRequest {
    /// Destination job.
    pub job_id: JobId,
    /// Destination deliverable within the job.
    pub deliverable_id: DeliverableId,
    /// Replacement service type, required when the destination deliverable
    /// has no pool for the task's current service type.
    pub service_type_remap: Option<ServiceTypeId>,
}

impl PromoteToJobTaskRequest {
    /// Creates a promotion request for the given job and deliverable.
    #[must_use]
    pub const fn new(job_id: JobId, deliverable_id: DeliverableId) -> Self {
        Self {
            job_id,
            deliverable_id,
            service_type_remap: None,
        }
    }

    /// Remaps the task's service type as part of the promotion.
    #[must_use]
    pub const fn with_service_type_remap(mut self, service_type_id: ServiceTypeId) -> Self {
        self.service_type_remap = Some(service_type_id);
        self
    }
}

/// Task lifecycle store over a workspace-scoped blob port.
#[derive(Clone)]
pub struct TaskStoreService<S, C>
where
    S: BlobStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskStoreService<S, C>
where
    S: BlobStore,
    C: Clock + Send + Sync,
{
    /// Creates a task store over the given blob store and clock.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a task and inserts it at the head of the collection.
    ///
    /// Status defaults to `in_progress`; the assignee defaults to the
    /// calling user and the assignor defaults to the assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Domain`] for validation failures and
    /// [`TaskStoreError::Storage`] when persistence fails.
    pub async fn create_task(
        &self,
        ctx: &WorkspaceContext,
        request: CreateTaskRequest,
    ) -> TaskStoreResult<Task> {
        let assignee = request.assignee_user_id.or(Some(ctx.current_user_id));
        let assignor = request.assignor_user_id.or(assignee);
        let data = NewTaskData {
            title: request.title,
            description: request.description,
            status: request.status.unwrap_or(TaskStatus::InProgress),
            due_date: request.due_date,
            service_type_id: request.service_type_id,
            loe_hours: request.loe_hours,
            assignee_user_id: assignee,
            assignor_user_id: assignor,
            is_internal: request.is_internal,
            company_id: request.company_id,
            person_id: request.person_id,
        };
        let task = Task::new(data, &*self.clock)?;

        let mut tasks = self.load_tasks(ctx).await?;
        tasks.insert(0, task.clone());
        self.save_tasks(ctx, &tasks).await?;
        Ok(task)
    }

    /// Merges a field patch into an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] for an unknown id, in contrast to
    /// the original application's silent no-op.
    pub async fn update_task(
        &self,
        ctx: &WorkspaceContext,
        id: TaskId,
        patch: TaskPatch,
    ) -> TaskStoreResult<Task> {
        self.mutate_task(ctx, id, |task, clock| task.apply_patch(patch, clock))
            .await
    }

    /// Looks a task up by id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Storage`] or [`TaskStoreError::Decode`] when
    /// the collection cannot be loaded.
    pub async fn get_task_by_id(
        &self,
        ctx: &WorkspaceContext,
        id: TaskId,
    ) -> TaskStoreResult<Option<Task>> {
        let tasks = self.load_tasks(ctx).await?;
        Ok(tasks.into_iter().find(|task| task.id() == id))
    }

    /// Lists tasks not attached to any job or deliverable.
    ///
    /// Promotion removes a task from this listing by attachment, not by
    /// deletion; the entity and its id are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Storage`] or [`TaskStoreError::Decode`] when
    /// the collection cannot be loaded.
    pub async fn list_quick_tasks(&self, ctx: &WorkspaceContext) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.load_tasks(ctx).await?;
        Ok(tasks.into_iter().filter(Task::is_quick_task).collect())
    }

    /// Lists tasks attached to the given deliverable.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Storage`] or [`TaskStoreError::Decode`] when
    /// the collection cannot be loaded.
    pub async fn list_job_tasks(
        &self,
        ctx: &WorkspaceContext,
        deliverable_id: DeliverableId,
    ) -> TaskStoreResult<Vec<Task>> {
        let tasks = self.load_tasks(ctx).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.deliverable_id() == Some(deliverable_id))
            .collect())
    }

    /// Archives a completed task. One-way.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ArchiveRequiresCompletion`] (wrapped) when
    /// the task is not completed.
    pub async fn archive_task(&self, ctx: &WorkspaceContext, id: TaskId) -> TaskStoreResult<Task> {
        self.mutate_task(ctx, id, |task, clock| task.archive(clock))
            .await
    }

    /// Deletes a task, subject to the deletion guard.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DeleteBlocked`] (wrapped) when the task is
    /// completed or has logged time; the collection is left unchanged.
    pub async fn delete_task(&self, ctx: &WorkspaceContext, id: TaskId) -> TaskStoreResult<()> {
        let mut tasks = self.load_tasks(ctx).await?;
        let index = tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(TaskStoreError::NotFound(id))?;
        let task = tasks
            .get(index)
            .ok_or(TaskStoreError::NotFound(id))?;
        if !task.can_delete() {
            return Err(TaskDomainError::DeleteBlocked(id).into());
        }
        tasks.remove(index);
        self.save_tasks(ctx, &tasks).await?;
        Ok(())
    }

    /// Moves a task to a new status.
    ///
    /// Entering `completed` records `completed_on` (today when absent,
    /// future dates rejected); leaving `completed` clears the completion
    /// date. Job tasks moving into `in_progress` or `completed` must pass
    /// the readiness check against their deliverable; quick tasks are not
    /// gated.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotReady`] (wrapped) with the outstanding
    /// gaps when an unready job task is scheduled, and
    /// [`TaskDomainError::CompletionDateInFuture`] (wrapped) for a future
    /// completion date.
    pub async fn set_task_status(
        &self,
        ctx: &WorkspaceContext,
        id: TaskId,
        to: TaskStatus,
        completed_on: Option<NaiveDate>,
    ) -> TaskStoreResult<Task> {
        let mut tasks = self.load_tasks(ctx).await?;
        let index = tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(TaskStoreError::NotFound(id))?;

        let gated = {
            let task = tasks.get(index).ok_or(TaskStoreError::NotFound(id))?;
            task.job_id().is_some()
                && matches!(to, TaskStatus::InProgress | TaskStatus::Completed)
        };
        if gated {
            let task = tasks.get(index).ok_or(TaskStoreError::NotFound(id))?;
            if let Some(deliverable_id) = task.deliverable_id() {
                let deliverable = self
                    .get_deliverable_by_id(ctx, deliverable_id)
                    .await?
                    .ok_or(TaskStoreError::DeliverableNotFound(deliverable_id))?;
                let gaps = task.readiness_gaps(&deliverable);
                if !gaps.is_empty() {
                    return Err(TaskDomainError::NotReady { task_id: id, gaps }.into());
                }
            }
        }

        let task = tasks
            .get_mut(index)
            .ok_or(TaskStoreError::NotFound(id))?;
        task.set_status(to, completed_on, &*self.clock)?;
        let updated = task.clone();
        self.save_tasks(ctx, &tasks).await?;
        Ok(updated)
    }

    /// Appends a time entry to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTimeEntryHours`] (wrapped) when the
    /// hours are not positive.
    pub async fn add_time_entry(
        &self,
        ctx: &WorkspaceContext,
        id: TaskId,
        entry: NewTimeEntry,
    ) -> TaskStoreResult<Task> {
        self.mutate_task(ctx, id, |task, clock| {
            task.add_time_entry(entry, clock).map(|_| ())
        })
        .await
    }

    /// Returns the sum of a task's logged hours.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] for an unknown id.
    pub async fn get_task_actual_hours(
        &self,
        ctx: &WorkspaceContext,
        id: TaskId,
    ) -> TaskStoreResult<f64> {
        let task = self
            .get_task_by_id(ctx, id)
            .await?
            .ok_or(TaskStoreError::NotFound(id))?;
        Ok(task.actual_hours())
    }

    /// Appends an allocation to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] for an unknown task.
    pub async fn add_allocation(
        &self,
        ctx: &WorkspaceContext,
        id: TaskId,
        allocation: NewAllocation,
    ) -> TaskStoreResult<Task> {
        self.mutate_task(ctx, id, |task, clock| {
            task.add_allocation(allocation, clock);
            Ok(())
        })
        .await
    }

    /// Patches an allocation on a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AllocationNotFound`] (wrapped) when the
    /// allocation id does not match.
    pub async fn update_allocation(
        &self,
        ctx: &WorkspaceContext,
        id: TaskId,
        allocation_id: AllocationId,
        patch: AllocationPatch,
    ) -> TaskStoreResult<Task> {
        self.mutate_task(ctx, id, |task, clock| {
            task.update_allocation(allocation_id, patch, clock)
        })
        .await
    }

    /// Removes an allocation from a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AllocationNotFound`] (wrapped) when the
    /// allocation id does not match.
    pub async fn remove_allocation(
        &self,
        ctx: &WorkspaceContext,
        id: TaskId,
        allocation_id: AllocationId,
    ) -> TaskStoreResult<Task> {
        self.mutate_task(ctx, id, |task, clock| {
            task.remove_allocation(allocation_id, clock)
        })
        .await
    }

    /// Promotes a quick task into a job.
    ///
    /// The destination deliverable must exist and belong to the requested
    /// job. When the deliverable has no pool for the task's service type the
    /// request must carry a remap, and the remapped service type must itself
    /// be covered.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DeliverableNotFound`],
    /// [`TaskStoreError::DeliverableJobMismatch`],
    /// [`TaskDomainError::ServiceTypeNotInPools`] (wrapped), or
    /// [`TaskDomainError::AlreadyJobTask`] (wrapped).
    pub async fn promote_to_job_task(
        &self,
        ctx: &WorkspaceContext,
        id: TaskId,
        request: PromoteToJobTaskRequest,
    ) -> TaskStoreResult<Task> {
        let deliverable = self
            .get_deliverable_by_id(ctx, request.deliverable_id)
            .await?
            .ok_or(TaskStoreError::DeliverableNotFound(request.deliverable_id))?;
        if deliverable.job_id != request.job_id {
            return Err(TaskStoreError::DeliverableJobMismatch {
                deliverable_id: request.deliverable_id,
                job_id: request.job_id,
            });
        }

        let mut tasks = self.load_tasks(ctx).await?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(TaskStoreError::NotFound(id))?;

        let effective_service_type = request.service_type_remap.or(task.service_type_id());
        if let Some(service_type_id) = effective_service_type {
            if !deliverable.supports_service_type(service_type_id) {
                return Err(TaskDomainError::ServiceTypeNotInPools {
                    deliverable_id: request.deliverable_id,
                    service_type_id,
                }
                .into());
            }
        }

        task.promote(
            request.job_id,
            request.deliverable_id,
            request.service_type_remap,
            &*self.clock,
        )?;
        let updated = task.clone();
        self.save_tasks(ctx, &tasks).await?;
        Ok(updated)
    }

    /// Inserts or replaces a deliverable.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Storage`] when persistence fails.
    pub async fn put_deliverable(
        &self,
        ctx: &WorkspaceContext,
        deliverable: Deliverable,
    ) -> TaskStoreResult<()> {
        let mut deliverables = self.load_deliverables(ctx).await?;
        match deliverables
            .iter_mut()
            .find(|existing| existing.id == deliverable.id)
        {
            Some(existing) => *existing = deliverable,
            None => deliverables.push(deliverable),
        }
        self.save_deliverables(ctx, &deliverables).await?;
        Ok(())
    }

    /// Looks a deliverable up by id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Storage`] or [`TaskStoreError::Decode`] when
    /// the collection cannot be loaded.
    pub async fn get_deliverable_by_id(
        &self,
        ctx: &WorkspaceContext,
        id: DeliverableId,
    ) -> TaskStoreResult<Option<Deliverable>> {
        let deliverables = self.load_deliverables(ctx).await?;
        Ok(deliverables
            .into_iter()
            .find(|deliverable| deliverable.id == id))
    }

    /// Lists the workspace's deliverables.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Storage`] or [`TaskStoreError::Decode`] when
    /// the collection cannot be loaded.
    pub async fn list_deliverables(
        &self,
        ctx: &WorkspaceContext,
    ) -> TaskStoreResult<Vec<Deliverable>> {
        self.load_deliverables(ctx).await
    }

    /// Returns a deliverable's pools with assigned/actual hours rolled up
    /// from its tasks' allocations.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DeliverableNotFound`] for an unknown id.
    pub async fn get_deliverable_capacity(
        &self,
        ctx: &WorkspaceContext,
        id: DeliverableId,
    ) -> TaskStoreResult<Vec<ServiceTypePool>> {
        let deliverable = self
            .get_deliverable_by_id(ctx, id)
            .await?
            .ok_or(TaskStoreError::DeliverableNotFound(id))?;
        let tasks = self.load_tasks(ctx).await?;
        Ok(deliverable.rollup_pools(&tasks))
    }

    /// Loads, mutates, and writes back a single task.
    async fn mutate_task<F>(
        &self,
        ctx: &WorkspaceContext,
        id: TaskId,
        mutate: F,
    ) -> TaskStoreResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskDomainError>,
    {
        let mut tasks = self.load_tasks(ctx).await?;
        let task = tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(TaskStoreError::NotFound(id))?;
        mutate(task, self.clock.as_ref())?;
        let updated = task.clone();
        self.save_tasks(ctx, &tasks).await?;
        Ok(updated)
    }

    async fn load_tasks(&self, ctx: &WorkspaceContext) -> TaskStoreResult<Vec<Task>> {
        self.load_collection(ctx, Collection::Tasks).await
    }

    async fn save_tasks(&self, ctx: &WorkspaceContext, tasks: &[Task]) -> TaskStoreResult<()> {
        self.save_collection(ctx, Collection::Tasks, tasks).await
    }

    async fn load_deliverables(&self, ctx: &WorkspaceContext) -> TaskStoreResult<Vec<Deliverable>> {
        self.load_collection(ctx, Collection::Deliverables).await
    }

    async fn save_deliverables(
        &self,
        ctx: &WorkspaceContext,
        deliverables: &[Deliverable],
    ) -> TaskStoreResult<()> {
        self.save_collection(ctx, Collection::Deliverables, deliverables)
            .await
    }

    /// Reads a whole collection blob; an absent blob is an empty collection.
    async fn load_collection<T>(
        &self,
        ctx: &WorkspaceContext,
        collection: Collection,
    ) -> TaskStoreResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let key = BlobKey::new(ctx.workspace_id, collection);
        let Some(value) = self.store.read(&key).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_value(value).map_err(|err| TaskStoreError::Decode {
            collection: collection.as_str(),
            source: err,
        })
    }

    /// Writes a whole collection blob.
    async fn save_collection<T>(
        &self,
        ctx: &WorkspaceContext,
        collection: Collection,
        records: &[T],
    ) -> TaskStoreResult<()>
    where
        T: Serialize,
    {
        let key = BlobKey::new(ctx.workspace_id, collection);
        let value = serde_json::to_value(records).map_err(|err| TaskStoreError::Decode {
            collection: collection.as_str(),
            source: err,
        })?;
        self.store.write(&key, &value).await?;
        Ok(())
    }
}
