//! Directory service: team-member and service-type listings with
//! seed-on-first-access semantics.

use crate::workspace::context::WorkspaceContext;
use crate::workspace::domain::{ServiceType, TeamMember};
use crate::workspace::ports::{BlobKey, BlobStore, Collection, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory service operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors returned by the directory service.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Persistence failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A stored directory collection could not be decoded.
    #[error("stored {collection} collection could not be decoded: {source}")]
    Decode {
        /// Collection that failed to decode.
        collection: &'static str,
        /// Underlying decode failure.
        source: serde_json::Error,
    },
}

/// Workspace directory access over the blob store.
///
/// A workspace that has never been opened before gets a small seeded
/// directory so the presentation layer always has assignees and service
/// types to offer.
#[derive(Clone)]
pub struct DirectoryService<S>
where
    S: BlobStore,
{
    store: Arc<S>,
}

impl<S> DirectoryService<S>
where
    S: BlobStore,
{
    /// Creates a directory service over the given blob store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Lists the workspace's team members, seeding defaults on first access.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when persistence fails or a stored
    /// collection cannot be decoded.
    pub async fn list_team_members(
        &self,
        ctx: &WorkspaceContext,
    ) -> DirectoryResult<Vec<TeamMember>> {
        self.load_or_seed(ctx, Collection::TeamMembers, default_team_members)
            .await
    }

    /// Lists the workspace's service types, seeding defaults on first access.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when persistence fails or a stored
    /// collection cannot be decoded.
    pub async fn list_service_types(
        &self,
        ctx: &WorkspaceContext,
    ) -> DirectoryResult<Vec<ServiceType>> {
        self.load_or_seed(ctx, Collection::ServiceTypes, default_service_types)
            .await
    }

    /// Loads a collection, writing and returning the seed when absent.
    async fn load_or_seed<T>(
        &self,
        ctx: &WorkspaceContext,
        collection: Collection,
        seed: fn() -> Vec<T>,
    ) -> DirectoryResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = BlobKey::new(ctx.workspace_id, collection);
        if let Some(value) = self.store.read(&key).await? {
            return serde_json::from_value(value).map_err(|err| DirectoryError::Decode {
                collection: collection.as_str(),
                source: err,
            });
        }

        let seeded = seed();
        let value = serde_json::to_value(&seeded).map_err(|err| DirectoryError::Decode {
            collection: collection.as_str(),
            source: err,
        })?;
        self.store.write(&key, &value).await?;
        Ok(seeded)
    }
}

/// Team members seeded into a fresh workspace.
fn default_team_members() -> Vec<TeamMember> {
    vec![
        TeamMember::new("Avery Quinn", "avery@jobdeck.test"),
        TeamMember::new("Jordan Lee", "jordan@jobdeck.test"),
        TeamMember::new("Sam Patel", "sam@jobdeck.test"),
    ]
}

/// Service types seeded into a fresh workspace.
fn default_service_types() -> Vec<ServiceType> {
    vec![
        ServiceType::new("Strategy"),
        ServiceType::new("Design"),
        ServiceType::new("Development"),
        ServiceType::new("Reporting"),
    ]
}
