//! Task list controller.
//!
//! # Responsibility
//! - Keep the in-memory task list, the rendered rows and the store in
//!   agreement after every user action.
//! - Funnel add and rename through one prompt-confirmation path.
//!
//! # Invariants
//! - `tasks[i]` is the task rendered at row `i`; new tasks append at the end.
//! - Every mutation updates the list and the view first, then commits.
//! - A failed commit is logged and recorded, never rolled back or retried:
//!   the view keeps showing the requested state.
//! - The list is re-derived from the store only by `load`.

use crate::model::task::{Task, TaskId};
use crate::repo::task_store::{StoreError, TaskStore};
use crate::service::prompt::{accepted_prompt_text, PromptIntent, TaskPrompt};
use crate::view::TaskListView;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store failure observed by the controller.
#[derive(Debug)]
pub enum TaskListError {
    /// `load` could not read records; the list was left empty.
    Fetch(StoreError),
    /// A mutation could not be made durable; the list was kept as requested.
    Commit(StoreError),
}

impl Display for TaskListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "failed to fetch tasks: {err}"),
            Self::Commit(err) => write!(f, "failed to commit tasks: {err}"),
        }
    }
}

impl Error for TaskListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fetch(err) | Self::Commit(err) => Some(err),
        }
    }
}

/// Result of confirming a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Blank text or a bound task that is gone; nothing changed.
    Dismissed,
    Created {
        index: usize,
        task_id: TaskId,
        persisted: bool,
    },
    Renamed {
        index: usize,
        task_id: TaskId,
        persisted: bool,
    },
}

/// Result of deleting one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub index: usize,
    pub task: Task,
    pub persisted: bool,
}

/// Owns the displayed task list and mediates every write to the store.
pub struct TaskListController<S: TaskStore, V: TaskListView> {
    store: S,
    view: V,
    tasks: Vec<Task>,
    last_error: Option<TaskListError>,
}

impl<S: TaskStore, V: TaskListView> TaskListController<S, V> {
    /// Creates a controller with an empty list; call `load` to populate it.
    pub fn new(store: S, view: V) -> Self {
        Self {
            store,
            view,
            tasks: Vec::new(),
            last_error: None,
        }
    }

    /// Replaces the list with the store's records and re-renders every row.
    ///
    /// On fetch failure the list is left empty; the error is logged and kept
    /// in `last_error`.
    pub fn load(&mut self) -> usize {
        match self.store.fetch_all() {
            Ok(tasks) => {
                self.tasks = tasks;
                self.last_error = None;
                info!(
                    "event=task_list_load module=task_list status=ok rows={}",
                    self.tasks.len()
                );
            }
            Err(err) => {
                error!("event=task_list_load module=task_list status=error error={err}");
                self.tasks.clear();
                self.last_error = Some(TaskListError::Fetch(err));
            }
        }
        self.view.reload_all(&self.tasks);
        self.tasks.len()
    }

    /// Opens an empty "Add" prompt.
    pub fn begin_add(&self) -> TaskPrompt {
        TaskPrompt::add()
    }

    /// Opens an "Update" prompt for the task at `index`.
    pub fn begin_update(&self, index: usize) -> Option<TaskPrompt> {
        self.tasks.get(index).map(TaskPrompt::update)
    }

    /// Opens an "Update" prompt for the task with `id`.
    pub fn begin_update_task(&self, id: TaskId) -> Option<TaskPrompt> {
        self.index_of(id).and_then(|index| self.begin_update(index))
    }

    /// Applies confirmed prompt text.
    ///
    /// Text that is blank after trimming dismisses the prompt without touching
    /// the list or the store. Otherwise the text, as typed, becomes the title
    /// of a new task (`Create`) or of the bound task (`Rename`).
    pub fn confirm(&mut self, text: &str, intent: PromptIntent) -> ConfirmOutcome {
        let Some(title) = accepted_prompt_text(text) else {
            info!("event=task_confirm module=task_list status=skipped reason=blank_text");
            return ConfirmOutcome::Dismissed;
        };

        match intent {
            PromptIntent::Create => self.create(title),
            PromptIntent::Rename(id) => self.rename(id, title),
        }
    }

    /// Deletes the task rendered at `index`.
    ///
    /// # Panics
    /// When `index` is out of range; the caller's rows are out of sync with
    /// this list.
    pub fn delete(&mut self, index: usize) -> DeleteOutcome {
        assert!(
            index < self.tasks.len(),
            "delete index {index} out of range for {} rows",
            self.tasks.len()
        );

        let task = self.tasks.remove(index);
        self.store.delete(task.id);
        self.view.delete_row(index);
        let persisted = self.commit();

        info!(
            "event=task_delete module=task_list status=ok row={index} persisted={persisted}"
        );
        DeleteOutcome {
            index,
            task,
            persisted,
        }
    }

    /// Deletes the task with `id` wherever it is currently rendered.
    pub fn delete_task(&mut self, id: TaskId) -> Option<DeleteOutcome> {
        self.index_of(id).map(|index| self.delete(index))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn row_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task_at(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Failure of the most recent store round-trip, if it failed.
    pub fn last_error(&self) -> Option<&TaskListError> {
        self.last_error.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    fn create(&mut self, title: &str) -> ConfirmOutcome {
        let draft = self.store.create();
        self.store.update(draft.id, title);
        let task = draft.with_title(title);
        let task_id = task.id;

        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        self.view.insert_row(index, &self.tasks[index]);
        let persisted = self.commit();

        info!(
            "event=task_create module=task_list status=ok row={index} persisted={persisted}"
        );
        ConfirmOutcome::Created {
            index,
            task_id,
            persisted,
        }
    }

    fn rename(&mut self, id: TaskId, title: &str) -> ConfirmOutcome {
        let Some(index) = self.index_of(id) else {
            warn!(
                "event=task_rename module=task_list status=skipped reason=task_missing task_id={id}"
            );
            return ConfirmOutcome::Dismissed;
        };

        self.store.update(id, title);
        self.tasks[index] = self.tasks[index].with_title(title);
        self.view.reload_row(index, &self.tasks[index]);
        let persisted = self.commit();

        info!(
            "event=task_rename module=task_list status=ok row={index} persisted={persisted}"
        );
        ConfirmOutcome::Renamed {
            index,
            task_id: id,
            persisted,
        }
    }

    fn commit(&mut self) -> bool {
        match self.store.commit() {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(err) => {
                error!(
                    "event=task_commit module=task_list status=error rows={} error={err}",
                    self.tasks.len()
                );
                self.last_error = Some(TaskListError::Commit(err));
                false
            }
        }
    }
}
