//! Unit tests for the task lifecycle context.

mod store_service_tests;

use crate::task::domain::{NewTaskData, TaskStatus};
use chrono::NaiveDate;

/// Builds a calendar day for test data.
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Minimal creation data for an internal in-progress task.
fn new_task_data(title: &str) -> NewTaskData {
    NewTaskData {
        title: title.to_owned(),
        description: None,
        status: TaskStatus::InProgress,
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
