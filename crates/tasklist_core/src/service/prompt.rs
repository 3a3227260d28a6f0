//! Add/update text-entry prompt.
//!
//! The prompt has exactly two variants chosen when it is opened; it never
//! switches between them.

use crate::model::task::{Task, TaskId};

pub const ADD_PROMPT_TITLE: &str = "New Task";
pub const UPDATE_PROMPT_TITLE: &str = "Update Task";
pub const PROMPT_MESSAGE: &str = "What do you want to do?";
pub const PROMPT_PLACEHOLDER: &str = "Task Name";
pub const ADD_ACTION_LABEL: &str = "Add";
pub const UPDATE_ACTION_LABEL: &str = "Update";
pub const CANCEL_ACTION_LABEL: &str = "Cancel";

/// What confirming the prompt will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptIntent {
    /// Append a new task.
    Create,
    /// Retitle the bound task.
    Rename(TaskId),
}

impl PromptIntent {
    pub fn bound_task(self) -> Option<TaskId> {
        match self {
            Self::Create => None,
            Self::Rename(id) => Some(id),
        }
    }
}

/// Presentation data for one opened prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPrompt {
    pub intent: PromptIntent,
    pub title: &'static str,
    pub message: &'static str,
    pub placeholder: &'static str,
    pub action_label: &'static str,
    pub cancel_label: &'static str,
    /// Text the entry field starts with.
    pub initial_text: String,
}

impl TaskPrompt {
    pub fn add() -> Self {
        Self {
            intent: PromptIntent::Create,
            title: ADD_PROMPT_TITLE,
            message: PROMPT_MESSAGE,
            placeholder: PROMPT_PLACEHOLDER,
            action_label: ADD_ACTION_LABEL,
            cancel_label: CANCEL_ACTION_LABEL,
            initial_text: String::new(),
        }
    }

    pub fn update(task: &Task) -> Self {
        Self {
            intent: PromptIntent::Rename(task.id),
            title: UPDATE_PROMPT_TITLE,
            action_label: UPDATE_ACTION_LABEL,
            initial_text: task.title.clone(),
            ..Self::add()
        }
    }
}

/// Returns the confirmed text as typed, or `None` when it is blank after
/// trimming and the confirm is a no-op.
pub fn accepted_prompt_text(text: &str) -> Option<&str> {
    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::{accepted_prompt_text, PromptIntent, TaskPrompt};
    use crate::model::task::Task;

    #[test]
    fn add_prompt_is_unbound_and_empty() {
        let prompt = TaskPrompt::add();
        assert_eq!(prompt.intent, PromptIntent::Create);
        assert_eq!(prompt.action_label, "Add");
        assert_eq!(prompt.title, "New Task");
        assert!(prompt.initial_text.is_empty());
        assert_eq!(prompt.intent.bound_task(), None);
    }

    #[test]
    fn update_prompt_is_bound_and_prefilled() {
        let task = Task::new("Buy milk");
        let prompt = TaskPrompt::update(&task);
        assert_eq!(prompt.intent, PromptIntent::Rename(task.id));
        assert_eq!(prompt.action_label, "Update");
        assert_eq!(prompt.title, "Update Task");
        assert_eq!(prompt.initial_text, "Buy milk");
        assert_eq!(prompt.placeholder, "Task Name");
        assert_eq!(prompt.cancel_label, "Cancel");
    }

    #[test]
    fn blank_text_is_rejected_and_other_text_kept_verbatim() {
        assert_eq!(accepted_prompt_text(""), None);
        assert_eq!(accepted_prompt_text("  \t"), None);
        assert_eq!(accepted_prompt_text("  Buy milk \n"), Some("  Buy milk \n"));
    }
}
