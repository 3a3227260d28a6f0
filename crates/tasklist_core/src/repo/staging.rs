//! Pending-change log shared by store implementations.

use crate::model::task::{validate_title, Task, TaskId, TaskValidationError};
use std::mem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StagedChange {
    Insert { task: Task, position: i64 },
    Rename { id: TaskId, title: String },
    Delete(TaskId),
}

impl StagedChange {
    fn validate(&self) -> Result<(), TaskValidationError> {
        match self {
            Self::Insert { task, .. } => task.validate(),
            Self::Rename { id, title } => validate_title(*id, title),
            Self::Delete(_) => Ok(()),
        }
    }
}

/// Ordered log of uncommitted changes.
///
/// Changes that target a record inserted in the same unit of work are folded
/// into that insert, so the log never references a draft that was cancelled.
#[derive(Debug, Default)]
pub(crate) struct StagedChanges {
    changes: Vec<StagedChange>,
}

impl StagedChanges {
    pub(crate) fn stage_insert(&mut self, task: Task, position: i64) {
        self.changes.push(StagedChange::Insert { task, position });
    }

    pub(crate) fn stage_rename(&mut self, id: TaskId, title: &str) {
        if let Some(task) = self.staged_insert_mut(id) {
            task.title = title.to_string();
            return;
        }
        self.changes.push(StagedChange::Rename {
            id,
            title: title.to_string(),
        });
    }

    pub(crate) fn stage_delete(&mut self, id: TaskId) {
        let staged_insert = self.changes.iter().position(
            |change| matches!(change, StagedChange::Insert { task, .. } if task.id == id),
        );
        if let Some(index) = staged_insert {
            self.changes.remove(index);
            return;
        }

        self.changes
            .retain(|change| !matches!(change, StagedChange::Rename { id: target, .. } if *target == id));
        self.changes.push(StagedChange::Delete(id));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), TaskValidationError> {
        self.changes.iter().try_for_each(StagedChange::validate)
    }

    /// Drains the log; callers either apply everything or drop it.
    pub(crate) fn take(&mut self) -> Vec<StagedChange> {
        mem::take(&mut self.changes)
    }

    fn staged_insert_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.changes.iter_mut().find_map(|change| match change {
            StagedChange::Insert { task, .. } if task.id == id => Some(task),
            _ => None,
        })
    }
}
