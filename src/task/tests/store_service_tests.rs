//! Service-level tests for the task store over the in-memory blob adapter.

use std::sync::Arc;

use super::date;
use crate::task::domain::{
    AllocationPatch, NewAllocation, NewTimeEntry, TaskDomainError, TaskId, TaskPatch, TaskStatus,
};
use crate::task::services::{CreateTaskRequest, TaskStoreError, TaskStoreService};
use crate::workspace::adapters::MemoryBlobStore;
use crate::workspace::context::WorkspaceContext;
use crate::workspace::domain::{UserId, WorkspaceId};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestStore = TaskStoreService<MemoryBlobStore, DefaultClock>;

#[fixture]
fn ctx() -> WorkspaceContext {
    WorkspaceContext::new(WorkspaceId::new(), UserId::new())
}

#[fixture]
fn service() -> TestStore {
    TaskStoreService::new(Arc::new(MemoryBlobStore::new()), Arc::new(DefaultClock))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_defaults_status_and_participants(service: TestStore, ctx: WorkspaceContext) {
    let task = service
        .create_task(&ctx, CreateTaskRequest::new("Draft proposal"))
        .await
        .expect("task creation should succeed");

    assert_eq!(task.status(), TaskStatus::InProgress);
    assert_eq!(task.assignee_user_id(), Some(ctx.current_user_id));
    assert_eq!(task.assignor_user_id(), Some(ctx.current_user_id));
    assert!(task.is_internal());
}

#[rstest]
#[case(TaskStatus::Backlog)]
#[case(TaskStatus::InProgress)]
#[case(TaskStatus::Completed)]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_completion_date_tracks_initial_status(
    #[case] status: TaskStatus,
    service: TestStore,
    ctx: WorkspaceContext,
) {
    let task = service
        .create_task(&ctx, CreateTaskRequest::new("Carried over").with_status(status))
        .await
        .expect("task creation should succeed");

    assert_eq!(task.status(), status);
    assert_eq!(
        task.completed_at().is_some(),
        status == TaskStatus::Completed
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignor_defaults_to_the_explicit_assignee(service: TestStore, ctx: WorkspaceContext) {
    let assignee = UserId::new();
    let task = service
        .create_task(
            &ctx,
            CreateTaskRequest::new("Draft proposal").with_assignee(assignee),
        )
        .await
        .expect("task creation should succeed");

    assert_eq!(task.assignee_user_id(), Some(assignee));
    assert_eq!(task.assignor_user_id(), Some(assignee));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn newest_task_lists_first(service: TestStore, ctx: WorkspaceContext) {
    let older = service
        .create_task(&ctx, CreateTaskRequest::new("Older"))
        .await
        .expect("first creation should succeed");
    let newer = service
        .create_task(&ctx, CreateTaskRequest::new("Newer"))
        .await
        .expect("second creation should succeed");

    let listed: Vec<TaskId> = service
        .list_quick_tasks(&ctx)
        .await
        .expect("listing should succeed")
        .iter()
        .map(|task| task.id())
        .collect();
    assert_eq!(listed, vec![newer.id(), older.id()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fresh_in_progress_task_can_be_deleted(service: TestStore, ctx: WorkspaceContext) {
    let task = service
        .create_task(&ctx, CreateTaskRequest::new("X").with_loe_hours(2.0))
        .await
        .expect("task creation should succeed");
    assert!(task.can_delete());

    service
        .delete_task(&ctx, task.id())
        .await
        .expect("deletion should succeed");

    let fetched = service
        .get_task_by_id(&ctx, task.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_with_logged_time_survives_deletion_attempt(
    service: TestStore,
    ctx: WorkspaceContext,
) {
    let task = service
        .create_task(&ctx, CreateTaskRequest::new("Billable"))
        .await
        .expect("task creation should succeed");
    service
        .add_time_entry(&ctx, task.id(), NewTimeEntry::new(date(2024, 1, 1), 1.0))
        .await
        .expect("time entry should append");

    let result = service.delete_task(&ctx, task.id()).await;
    match result {
        Err(TaskStoreError::Domain(TaskDomainError::DeleteBlocked(id))) => {
            assert_eq!(id, task.id());
        }
        other => panic!("expected DeleteBlocked, got {other:?}"),
    }

    let fetched = service
        .get_task_by_id(&ctx, task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should still exist");
    assert_eq!(fetched.time_entries().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_task_cannot_be_deleted(service: TestStore, ctx: WorkspaceContext) {
    let task = service
        .create_task(&ctx, CreateTaskRequest::new("Done deal"))
        .await
        .expect("task creation should succeed");
    service
        .set_task_status(&ctx, task.id(), TaskStatus::Completed, None)
        .await
        .expect("completion should succeed");

    let result = service.delete_task(&ctx, task.id()).await;
    assert!(matches!(
        result,
        Err(TaskStoreError::Domain(TaskDomainError::DeleteBlocked(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn quick_tasks_move_to_completed_without_readiness_checks(
    service: TestStore,
    ctx: WorkspaceContext,
) {
    // Quick tasks are not readiness-gated; only job tasks consume pools.
    let task = service
        .create_task(&ctx, CreateTaskRequest::new("Loose end"))
        .await
        .expect("task creation should succeed");

    let updated = service
        .set_task_status(
            &ctx,
            task.id(),
            TaskStatus::Completed,
            Some(date(2024, 1, 5)),
        )
        .await
        .expect("quick task completion should not be gated");
    assert_eq!(updated.completed_at(), Some(date(2024, 1, 5)));

    let reopened = service
        .set_task_status(&ctx, task.id(), TaskStatus::Backlog, None)
        .await
        .expect("reopen should succeed");
    assert_eq!(reopened.completed_at(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn archive_is_rejected_before_completion(service: TestStore, ctx: WorkspaceContext) {
    let task = service
        .create_task(&ctx, CreateTaskRequest::new("In flight"))
        .await
        .expect("task creation should succeed");

    let result = service.archive_task(&ctx, task.id()).await;
    assert!(matches!(
        result,
        Err(TaskStoreError::Domain(
            TaskDomainError::ArchiveRequiresCompletion(_)
        ))
    ));

    service
        .set_task_status(&ctx, task.id(), TaskStatus::Completed, None)
        .await
        .expect("completion should succeed");
    let archived = service
        .archive_task(&ctx, task.id())
        .await
        .expect("archive should succeed once completed");
    assert!(archived.is_archived());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_updates_are_reported_not_swallowed(
    service: TestStore,
    ctx: WorkspaceContext,
) {
    let result = service
        .update_task(&ctx, TaskId::new(), TaskPatch::default())
        .await;
    assert!(matches!(result, Err(TaskStoreError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mutations_are_visible_through_a_second_service_instance(ctx: WorkspaceContext) {
    let blobs = Arc::new(MemoryBlobStore::new());
    let writer = TaskStoreService::new(Arc::clone(&blobs), Arc::new(DefaultClock));
    let reader = TaskStoreService::new(blobs, Arc::new(DefaultClock));

    let task = writer
        .create_task(&ctx, CreateTaskRequest::new("Shared"))
        .await
        .expect("task creation should succeed");

    let fetched = reader
        .get_task_by_id(&ctx, task.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, Some(task));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workspaces_do_not_see_each_other(service: TestStore, ctx: WorkspaceContext) {
    let other = WorkspaceContext::new(WorkspaceId::new(), ctx.current_user_id);
    service
        .create_task(&ctx, CreateTaskRequest::new("Mine"))
        .await
        .expect("task creation should succeed");

    let listed = service
        .list_quick_tasks(&other)
        .await
        .expect("listing should succeed");
    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn actual_hours_follow_logged_entries(service: TestStore, ctx: WorkspaceContext) {
    let task = service
        .create_task(&ctx, CreateTaskRequest::new("Tracked"))
        .await
        .expect("task creation should succeed");
    service
        .add_time_entry(&ctx, task.id(), NewTimeEntry::new(date(2024, 1, 1), 1.5))
        .await
        .expect("first entry should append");
    service
        .add_time_entry(&ctx, task.id(), NewTimeEntry::new(date(2024, 1, 2), 2.25))
        .await
        .expect("second entry should append");

    let hours = service
        .get_task_actual_hours(&ctx, task.id())
        .await
        .expect("aggregate should succeed");
    assert!((hours - 3.75).abs() < f64::EPSILON);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_time_entry_leaves_the_store_unchanged(
    service: TestStore,
    ctx: WorkspaceContext,
) {
    let task = service
        .create_task(&ctx, CreateTaskRequest::new("Strict"))
        .await
        .expect("task creation should succeed");

    let result = service
        .add_time_entry(&ctx, task.id(), NewTimeEntry::new(date(2024, 1, 1), -1.0))
        .await;
    assert!(matches!(
        result,
        Err(TaskStoreError::Domain(
            TaskDomainError::InvalidTimeEntryHours(_)
        ))
    ));

    let fetched = service
        .get_task_by_id(&ctx, task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert!(fetched.time_entries().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn allocations_can_be_added_patched_and_removed(service: TestStore, ctx: WorkspaceContext) {
    let task = service
        .create_task(&ctx, CreateTaskRequest::new("Split work"))
        .await
        .expect("task creation should succeed");

    let with_allocation = service
        .add_allocation(
            &ctx,
            task.id(),
            NewAllocation {
                assignee_user_id: Some(UserId::new()),
                service_type_id: None,
                loe_hours: 5.0,
            },
        )
        .await
        .expect("allocation should append");
    let allocation_id = with_allocation
        .allocations()
        .first()
        .expect("one allocation")
        .id;

    let patched = service
        .update_allocation(
            &ctx,
            task.id(),
            allocation_id,
            AllocationPatch {
                loe_hours: Some(8.0),
                actual_hours: Some(2.0),
                ..AllocationPatch::default()
            },
        )
        .await
        .expect("patch should apply");
    let allocation = patched
        .allocations()
        .first()
        .expect("allocation should remain");
    assert!((allocation.loe_hours - 8.0).abs() < f64::EPSILON);
    assert!((allocation.actual_hours - 2.0).abs() < f64::EPSILON);

    let emptied = service
        .remove_allocation(&ctx, task.id(), allocation_id)
        .await
        .expect("removal should succeed");
    assert!(emptied.allocations().is_empty());
}
