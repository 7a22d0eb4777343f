//! Domain types for workspace scoping and the workspace directory.

mod directory;
mod ids;

pub use directory::{ServiceType, TeamMember};
pub use ids::{CompanyId, PersonId, ServiceTypeId, UserId, WorkspaceId};

pub(crate) use ids::define_id;
