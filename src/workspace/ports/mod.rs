//! Port contracts for workspace-scoped persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the task and
//! directory services.

pub mod blob;

pub use blob::{BlobKey, BlobStore, Collection, StorageError, StorageResult};
