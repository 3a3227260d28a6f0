//! Task store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the unit-of-work contract the task list controller writes through.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Writes are staged and become durable only on `commit()`.
//! - Commit validates titles before touching durable state.

pub mod memory_store;
pub mod sqlite_store;
mod staging;
pub mod task_store;
