//! Key-value blob persistence port.
//!
//! The original application persisted whole collections as JSON blobs in
//! same-origin browser storage and swallowed write failures. This port keeps
//! the blob-per-collection contract but makes every operation fallible so
//! callers decide how to surface storage trouble.

use crate::workspace::domain::WorkspaceId;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for blob store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Collections persisted per workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Quick tasks and job tasks, stored as one collection.
    Tasks,
    /// Job deliverables and their service-type pools.
    Deliverables,
    /// Workspace team members.
    TeamMembers,
    /// Workspace service types.
    ServiceTypes,
}

impl Collection {
    /// Returns the canonical storage segment for the collection.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Deliverables => "deliverables",
            Self::TeamMembers => "team_members",
            Self::ServiceTypes => "service_types",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workspace-scoped key addressing one persisted collection blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobKey {
    workspace_id: WorkspaceId,
    collection: Collection,
}

impl BlobKey {
    /// Creates a key for the given workspace and collection.
    #[must_use]
    pub const fn new(workspace_id: WorkspaceId, collection: Collection) -> Self {
        Self {
            workspace_id,
            collection,
        }
    }

    /// Returns the workspace component of the key.
    #[must_use]
    pub const fn workspace_id(self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the collection component of the key.
    #[must_use]
    pub const fn collection(self) -> Collection {
        self.collection
    }

    /// Returns the flat storage key, `{workspace_id}::{collection}`.
    #[must_use]
    pub fn storage_key(self) -> String {
        format!("{}::{}", self.workspace_id, self.collection.as_str())
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.storage_key())
    }
}

/// Blob persistence contract.
///
/// Adapters are synchronous internally but expose an async surface so the
/// service layer does not care whether the backing medium is a process-local
/// map or a filesystem directory.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Reads the blob stored under `key`.
    ///
    /// Returns `None` when nothing has been written for the key yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] when the backing medium fails or
    /// [`StorageError::Codec`] when a stored blob is not valid JSON.
    async fn read(&self, key: &BlobKey) -> StorageResult<Option<Value>>;

    /// Writes `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] when the backing medium fails.
    async fn write(&self, key: &BlobKey, value: &Value) -> StorageResult<()>;
}

/// Errors returned by blob store implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The backing medium failed.
    #[error("storage backend failure: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),

    /// A stored blob could not be parsed as JSON.
    #[error("stored blob {key} is not valid JSON: {source}")]
    Codec {
        /// Key whose blob failed to parse.
        key: String,
        /// Underlying parse failure.
        source: Arc<serde_json::Error>,
    },
}

impl StorageError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }

    /// Wraps a JSON parse failure for the given key.
    #[must_use]
    pub fn codec(key: &BlobKey, source: serde_json::Error) -> Self {
        Self::Codec {
            key: key.storage_key(),
            source: Arc::new(source),
        }
    }
}
