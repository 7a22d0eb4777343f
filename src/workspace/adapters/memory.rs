//! In-memory blob store for tests and in-process use.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::workspace::ports::{BlobKey, BlobStore, StorageError, StorageResult};

/// Thread-safe in-memory blob store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryBlobStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn read(&self, key: &BlobKey) -> StorageResult<Option<Value>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|err| StorageError::backend(std::io::Error::other(err.to_string())))?;
        Ok(blobs.get(&key.storage_key()).cloned())
    }

    async fn write(&self, key: &BlobKey, value: &Value) -> StorageResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|err| StorageError::backend(std::io::Error::other(err.to_string())))?;
        blobs.insert(key.storage_key(), value.clone());
        Ok(())
    }
}
