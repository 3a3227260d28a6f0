//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the task list's user-level operations.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod prompt;
pub mod task_list;
