//! Domain model for the task list.
//!
//! # Responsibility
//! - Define canonical task records used by the store and the controller.
//!
//! # Invariants
//! - Every task is identified by a stable, store-assigned `TaskId`.
//! - Tasks are plain values; persistence changes go through `TaskStore`.

pub mod task;
