//! Explicit call context replacing the original application's ambient
//! "current workspace" and "current user" globals.

use super::domain::{UserId, WorkspaceId};
use serde::{Deserialize, Serialize};

/// Identifies the workspace and acting user for a store call.
///
/// Every service operation takes a context parameter rather than reading
/// shared mutable state, so callers stay independently testable and two
/// workspaces never observe each other's collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceContext {
    /// Workspace whose collections the call operates on.
    pub workspace_id: WorkspaceId,
    /// User performing the call; used for assignor/assignee defaulting.
    pub current_user_id: UserId,
}

impl WorkspaceContext {
    /// Creates a context for the given workspace and acting user.
    #[must_use]
    pub const fn new(workspace_id: WorkspaceId, current_user_id: UserId) -> Self {
        Self {
            workspace_id,
            current_user_id,
        }
    }
}
