//! In-memory task store.
//!
//! Same staging and commit contract as `SqliteTaskStore`, without durability.
//! Failure switches let callers exercise fetch and commit error paths.

use crate::model::task::{Task, TaskId};
use crate::repo::staging::{StagedChange, StagedChanges};
use crate::repo::task_store::{StoreError, StoreResult, TaskStore};
use log::{error, info};
use std::cell::Cell;

#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    records: Vec<Task>,
    staged: StagedChanges,
    fail_fetch: bool,
    fail_next_commit: bool,
    commit_calls: usize,
    fetch_calls: Cell<usize>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with already-committed records, in order.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            records: tasks.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Committed records in store-native order.
    pub fn records(&self) -> &[Task] {
        &self.records
    }

    /// Makes every following `fetch_all` fail until switched off.
    pub fn set_fetch_failure(&mut self, fail: bool) {
        self.fail_fetch = fail;
    }

    /// Makes the next `commit` that has staged changes fail.
    pub fn fail_next_commit(&mut self) {
        self.fail_next_commit = true;
    }

    /// Number of `fetch_all` calls, including failed ones.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.get()
    }

    /// Number of `commit` calls, including no-op and failed ones.
    pub fn commit_calls(&self) -> usize {
        self.commit_calls
    }
}

impl TaskStore for MemoryTaskStore {
    fn fetch_all(&self) -> StoreResult<Vec<Task>> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);
        if self.fail_fetch {
            return Err(StoreError::Unavailable("fetch disabled".to_string()));
        }
        Ok(self.records.clone())
    }

    fn create(&mut self) -> Task {
        let task = Task::draft();
        let position = i64::try_from(self.records.len()).unwrap_or(i64::MAX);
        self.staged.stage_insert(task.clone(), position);
        task
    }

    fn update(&mut self, id: TaskId, title: &str) {
        self.staged.stage_rename(id, title);
    }

    fn delete(&mut self, id: TaskId) {
        self.staged.stage_delete(id);
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.commit_calls += 1;
        if self.staged.is_empty() {
            return Ok(());
        }

        let validation = self.staged.validate();
        let changes = self.staged.take();
        let result = if std::mem::take(&mut self.fail_next_commit) {
            Err(StoreError::Unavailable("commit disabled".to_string()))
        } else {
            validation
                .map_err(StoreError::from)
                .and_then(|()| apply_changes(&self.records, &changes))
                .map(|records| self.records = records)
        };

        match &result {
            Ok(()) => info!(
                "event=store_commit module=store status=ok backend=memory changes={}",
                changes.len()
            ),
            Err(err) => error!(
                "event=store_commit module=store status=error backend=memory discarded_changes={} error={err}",
                changes.len()
            ),
        }
        result
    }

    fn has_pending_changes(&self) -> bool {
        !self.staged.is_empty()
    }
}

fn apply_changes(records: &[Task], changes: &[StagedChange]) -> StoreResult<Vec<Task>> {
    let mut next = records.to_vec();
    for change in changes {
        match change {
            StagedChange::Insert { task, .. } => next.push(task.clone()),
            StagedChange::Rename { id, title } => {
                let task = next
                    .iter_mut()
                    .find(|task| task.id == *id)
                    .ok_or(StoreError::NotFound(*id))?;
                task.title = title.clone();
            }
            StagedChange::Delete(id) => {
                let index = next
                    .iter()
                    .position(|task| task.id == *id)
                    .ok_or(StoreError::NotFound(*id))?;
                next.remove(index);
            }
        }
    }
    Ok(next)
}
