//! Filesystem blob store backed by a capability-scoped directory.
//!
//! Each key maps to one JSON file inside the directory handle, standing in
//! for the original application's same-origin local storage. The adapter
//! never touches paths outside the directory it was opened with.

use async_trait::async_trait;
use cap_std::fs_utf8::Dir;
use serde_json::Value;
use std::io::ErrorKind;

use crate::workspace::ports::{BlobKey, BlobStore, StorageError, StorageResult};

/// Blob store persisting one file per workspace collection.
#[derive(Debug)]
pub struct FsBlobStore {
    dir: Dir,
}

impl FsBlobStore {
    /// Creates a store writing into the given directory handle.
    #[must_use]
    pub const fn new(dir: Dir) -> Self {
        Self { dir }
    }

    /// File name for a key: `{workspace_id}.{collection}.json`.
    fn file_name(key: &BlobKey) -> String {
        format!("{}.{}.json", key.workspace_id(), key.collection().as_str())
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn read(&self, key: &BlobKey) -> StorageResult<Option<Value>> {
        let name = Self::file_name(key);
        let raw = match self.dir.read_to_string(&name) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::backend(err)),
        };
        let value = serde_json::from_str(&raw).map_err(|err| StorageError::codec(key, err))?;
        Ok(Some(value))
    }

    async fn write(&self, key: &BlobKey, value: &Value) -> StorageResult<()> {
        let name = Self::file_name(key);
        let bytes = serde_json::to_vec_pretty(value).map_err(StorageError::backend)?;
        self.dir.write(&name, bytes).map_err(StorageError::backend)?;
        Ok(())
    }
}
