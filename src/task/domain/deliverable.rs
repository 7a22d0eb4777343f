//! Deliverables and their service-type capacity pools.

use super::allocation::Allocation;
use super::ids::{DeliverableId, JobId};
use super::status::TaskStatus;
use super::task::Task;
use crate::workspace::domain::ServiceTypeId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A deliverable-scoped budget of hours for one service type.
///
/// Task allocations are validated against pools: an allocation may only
/// draw on a service type the deliverable has a pool for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypePool {
    /// Service type the pool budgets for.
    pub service_type_id: ServiceTypeId,
    /// Hours budgeted for this service type.
    pub estimated_hours: f64,
    /// Hours currently assigned via task allocations.
    pub assigned_hours: f64,
    /// Hours actually worked.
    pub actual_hours: f64,
}

impl ServiceTypePool {
    /// Creates a pool with the given budget and no assigned or actual hours.
    #[must_use]
    pub const fn new(service_type_id: ServiceTypeId, estimated_hours: f64) -> Self {
        Self {
            service_type_id,
            estimated_hours,
            assigned_hours: 0.0,
            actual_hours: 0.0,
        }
    }
}

/// A group of tasks within a job, carrying the capacity pools their
/// allocations are validated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    /// Deliverable identifier.
    pub id: DeliverableId,
    /// Owning job.
    pub job_id: JobId,
    /// Display name.
    pub name: String,
    /// Lifecycle status; deliverables share the task status vocabulary.
    pub status: TaskStatus,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Service-type capacity pools.
    pub pools: Vec<ServiceTypePool>,
}

impl Deliverable {
    /// Creates a backlog deliverable with the given pools.
    #[must_use]
    pub fn new(job_id: JobId, name: impl Into<String>, pools: Vec<ServiceTypePool>) -> Self {
        Self {
            id: DeliverableId::new(),
            job_id,
            name: name.into(),
            status: TaskStatus::Backlog,
            due_date: None,
            pools,
        }
    }

    /// Returns whether the deliverable has a pool for the service type.
    #[must_use]
    pub fn supports_service_type(&self, service_type_id: ServiceTypeId) -> bool {
        self.pool(service_type_id).is_some()
    }

    /// Returns the pool for a service type, if any.
    #[must_use]
    pub fn pool(&self, service_type_id: ServiceTypeId) -> Option<&ServiceTypePool> {
        self.pools
            .iter()
            .find(|pool| pool.service_type_id == service_type_id)
    }

    /// Recomputes pool assigned/actual hours from the tasks attached to this
    /// deliverable.
    ///
    /// The stored pool figures are treated as budgets; the rolled-up figures
    /// are derived from allocations at read time for capacity views.
    #[must_use]
    pub fn rollup_pools(&self, tasks: &[Task]) -> Vec<ServiceTypePool> {
        let allocations: Vec<&Allocation> = tasks
            .iter()
            .filter(|task| task.deliverable_id() == Some(self.id))
            .flat_map(Task::allocations)
            .collect();

        self.pools
            .iter()
            .map(|pool| {
                let (assigned, actual) = allocations
                    .iter()
                    .filter(|alloc| alloc.service_type_id == Some(pool.service_type_id))
                    .fold((0.0, 0.0), |(assigned, actual), alloc| {
                        (assigned + alloc.loe_hours, actual + alloc.actual_hours)
                    });
                ServiceTypePool {
                    service_type_id: pool.service_type_id,
                    estimated_hours: pool.estimated_hours,
                    assigned_hours: assigned,
                    actual_hours: actual,
                }
            })
            .collect()
    }
}
