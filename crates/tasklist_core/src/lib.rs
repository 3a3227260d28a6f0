//! Core domain logic for the task list app.
//! This crate is the single source of truth for list/store consistency.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use repo::memory_store::MemoryTaskStore;
pub use repo::sqlite_store::SqliteTaskStore;
pub use repo::task_store::{StoreError, StoreResult, TaskStore};
pub use service::prompt::{PromptIntent, TaskPrompt};
pub use service::task_list::{ConfirmOutcome, DeleteOutcome, TaskListController, TaskListError};
pub use view::{RowMirror, TaskListView};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
