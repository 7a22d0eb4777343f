//! Task lifecycle management for JobDeck.
//!
//! This module owns quick-task and job-task records: creation, field
//! patches, the status state machine with its completion-date effects,
//! logged time, allocation sub-records, the promotion workflow that
//! attaches a quick task to a job deliverable, and the archival and
//! deletion guards. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]
//!
//! Persistence goes through the workspace blob port
//! ([`crate::workspace::ports`]); the task context has no storage adapters
//! of its own.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
