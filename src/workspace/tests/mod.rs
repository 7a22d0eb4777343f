//! Unit tests for the workspace context.

mod blob_store_tests;
