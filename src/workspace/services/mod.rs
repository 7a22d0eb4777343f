//! Application services for the workspace context.

mod directory;

pub use directory::{DirectoryError, DirectoryResult, DirectoryService};
