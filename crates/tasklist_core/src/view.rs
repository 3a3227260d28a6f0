//! Rendering surface driven by the task list controller.
//!
//! # Responsibility
//! - Describe the row-level notifications a list UI needs.
//! - Provide `RowMirror`, a headless view that records rendered titles.
//!
//! # Invariants
//! - Row indices passed to a view are valid for the list state right after
//!   the notification (insert) or right before it (delete).

use crate::model::task::Task;

/// Row-level sink for task list changes.
pub trait TaskListView {
    /// Replaces every row.
    fn reload_all(&mut self, tasks: &[Task]);
    /// Inserts one row at `index`.
    fn insert_row(&mut self, index: usize, task: &Task);
    /// Redraws the row at `index` in place.
    fn reload_row(&mut self, index: usize, task: &Task);
    /// Removes the row at `index`.
    fn delete_row(&mut self, index: usize);
}

/// Headless view that keeps the text of every rendered row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMirror {
    rows: Vec<String>,
    full_reloads: usize,
}

impl RowMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// How many times the whole list was re-rendered.
    pub fn full_reloads(&self) -> usize {
        self.full_reloads
    }
}

impl TaskListView for RowMirror {
    fn reload_all(&mut self, tasks: &[Task]) {
        self.rows = tasks.iter().map(|task| task.title.clone()).collect();
        self.full_reloads += 1;
    }

    fn insert_row(&mut self, index: usize, task: &Task) {
        self.rows.insert(index, task.title.clone());
    }

    fn reload_row(&mut self, index: usize, task: &Task) {
        self.rows[index] = task.title.clone();
    }

    fn delete_row(&mut self, index: usize) {
        self.rows.remove(index);
    }
}
