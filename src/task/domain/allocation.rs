//! Allocation sub-records: splitting one job task's effort across several
//! assignees and service types.

use super::ids::AllocationId;
use crate::workspace::domain::{ServiceTypeId, UserId};
use serde::{Deserialize, Serialize};

/// One slice of a job task's effort.
///
/// Allocations are validated against the owning deliverable's service-type
/// pools when readiness is evaluated, not when they are appended; a draft
/// allocation may be incomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    /// Allocation identifier.
    pub id: AllocationId,
    /// Team member the slice is assigned to.
    pub assignee_user_id: Option<UserId>,
    /// Service type the slice draws on.
    pub service_type_id: Option<ServiceTypeId>,
    /// Level-of-effort estimate in hours.
    pub loe_hours: f64,
    /// Hours actually worked against this slice.
    pub actual_hours: f64,
}

/// Payload for appending an allocation; the id is generated on append.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NewAllocation {
    /// Team member the slice is assigned to.
    pub assignee_user_id: Option<UserId>,
    /// Service type the slice draws on.
    pub service_type_id: Option<ServiceTypeId>,
    /// Level-of-effort estimate in hours.
    pub loe_hours: f64,
}

/// Field patch for an existing allocation. `None` leaves a field unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AllocationPatch {
    /// New assignee, if changing.
    pub assignee_user_id: Option<UserId>,
    /// New service type, if changing.
    pub service_type_id: Option<ServiceTypeId>,
    /// New LOE estimate, if changing.
    pub loe_hours: Option<f64>,
    /// New actual-hours figure, if changing.
    pub actual_hours: Option<f64>,
}

impl Allocation {
    /// Creates an allocation from an append payload.
    #[must_use]
    pub fn from_new(new: NewAllocation) -> Self {
        Self {
            id: AllocationId::new(),
            assignee_user_id: new.assignee_user_id,
            service_type_id: new.service_type_id,
            loe_hours: new.loe_hours,
            actual_hours: 0.0,
        }
    }

    /// Applies a field patch in place.
    pub fn apply_patch(&mut self, patch: AllocationPatch) {
        if let Some(assignee) = patch.assignee_user_id {
            self.assignee_user_id = Some(assignee);
        }
        if let Some(service_type) = patch.service_type_id {
            self.service_type_id = Some(service_type);
        }
        if let Some(loe) = patch.loe_hours {
            self.loe_hours = loe;
        }
        if let Some(actual) = patch.actual_hours {
            self.actual_hours = actual;
        }
    }
}
