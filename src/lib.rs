//! JobDeck: task lifecycle core for a workspace productivity application.
//!
//! This crate provides the core functionality behind quick tasks and job
//! tasks: the status state machine, time logging, allocation splitting,
//! deliverable capacity pools, and the promotion workflow, over a
//! workspace-scoped key-value persistence port.
//!
//! # Architecture
//!
//! JobDeck follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, filesystem)
//!
//! # Modules
//!
//! - [`workspace`]: Call context, blob persistence port and adapters, and
//!   the seeded workspace directory
//! - [`task`]: Task records, lifecycle rules, and the task store service

pub mod task;
pub mod workspace;
