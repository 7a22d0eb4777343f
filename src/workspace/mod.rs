//! Workspace context for JobDeck.
//!
//! Everything in the store is scoped to a workspace: persisted collections
//! are keyed by workspace id, and every service call carries an explicit
//! [`context::WorkspaceContext`] instead of reading ambient globals. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Directory services in [`services`]

pub mod adapters;
pub mod context;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
