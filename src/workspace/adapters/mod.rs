//! Adapter implementations of the workspace persistence port.

pub mod fs;
pub mod memory;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
