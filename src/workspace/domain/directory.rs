//! Directory entities: the people and service types a workspace can assign
//! work to.

use super::{ServiceTypeId, UserId};
use serde::{Deserialize, Serialize};

/// A person who can be assigned or assignor of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Team member identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email address.
    pub email: String,
}

impl TeamMember {
    /// Creates a team member with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A category of billable work, referenced by tasks, allocations, and
/// deliverable capacity pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceType {
    /// Service type identifier.
    pub id: ServiceTypeId,
    /// Display name.
    pub name: String,
}

impl ServiceType {
    /// Creates a service type with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ServiceTypeId::new(),
            name: name.into(),
        }
    }
}
