//! Task domain model.
//!
//! # Responsibility
//! - Define the to-do record rendered as one list row.
//! - Provide title validation shared by every store implementation.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - A committed task never has an empty (or whitespace-only) title.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one task record.
pub type TaskId = Uuid;

/// Validation failure for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    EmptyTitle(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle(id) => write!(f, "task {id} has an empty title"),
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identity.
    pub id: TaskId,
    /// User-visible text shown in the row.
    pub title: String,
}

impl Task {
    /// Creates a task with a freshly generated identity.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates a task with a caller-provided identity.
    ///
    /// Used by stores when reading records back.
    pub fn with_id(id: TaskId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Creates an untitled draft; the title must be set before commit.
    pub fn draft() -> Self {
        Self::new(String::new())
    }

    /// Returns a copy of this task carrying `title`, keeping identity.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self::with_id(self.id, title)
    }

    /// Checks invariants required before persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(self.id, &self.title)
    }
}

pub(crate) fn validate_title(id: TaskId, title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskValidationError};

    #[test]
    fn draft_fails_validation_until_titled() {
        let draft = Task::draft();
        assert_eq!(
            draft.validate(),
            Err(TaskValidationError::EmptyTitle(draft.id))
        );

        let titled = draft.with_title("Buy milk");
        assert_eq!(titled.id, draft.id);
        assert!(titled.validate().is_ok());
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let task = Task::new(" \t\n");
        assert!(task.validate().is_err());
    }

    #[test]
    fn serializes_as_id_and_title() {
        let task = Task::new("Buy milk");
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": task.id.to_string(), "title": "Buy milk" })
        );
    }

    #[test]
    fn new_tasks_get_distinct_ids() {
        assert_ne!(Task::new("a").id, Task::new("a").id);
    }
}
