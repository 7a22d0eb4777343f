//! Application services for the task lifecycle.

mod store;

pub use store::{
    CreateTaskRequest, PromoteToJobTaskRequest, TaskStoreError, TaskStoreResult, TaskStoreService,
};
