//! SQLite-backed task store.
//!
//! # Responsibility
//! - Persist task records in the `tasks` table.
//! - Apply a unit of staged changes atomically on commit.
//!
//! # Invariants
//! - Store-native order is `position ASC, uuid ASC`; new records take the next
//!   position, so they sort after everything already known.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::task::{Task, TaskId};
use crate::repo::staging::{StagedChange, StagedChanges};
use crate::repo::task_store::{StoreError, StoreResult, TaskStore};
use log::{error, info};
use rusqlite::{params, Connection, Row, Transaction};
use std::time::Instant;
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title
FROM tasks
ORDER BY position ASC, uuid ASC";

/// Durable task store over an owned SQLite connection.
pub struct SqliteTaskStore {
    conn: Connection,
    staged: StagedChanges,
    next_position: i64,
}

impl SqliteTaskStore {
    /// Wraps a migrated connection (see `db::open_db`).
    ///
    /// Fails when the `tasks` table cannot be read.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let max_position: Option<i64> =
            conn.query_row("SELECT MAX(position) FROM tasks;", [], |row| row.get(0))?;
        Ok(Self {
            conn,
            staged: StagedChanges::default(),
            next_position: max_position.map_or(0, |position| position + 1),
        })
    }

    /// Borrows the underlying connection for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TaskStore for SqliteTaskStore {
    fn fetch_all(&self) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(TASK_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn create(&mut self) -> Task {
        let task = Task::draft();
        self.staged.stage_insert(task.clone(), self.next_position);
        self.next_position += 1;
        task
    }

    fn update(&mut self, id: TaskId, title: &str) {
        self.staged.stage_rename(id, title);
    }

    fn delete(&mut self, id: TaskId) {
        self.staged.stage_delete(id);
    }

    fn commit(&mut self) -> StoreResult<()> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let started_at = Instant::now();
        let validation = self.staged.validate();
        let changes = self.staged.take();
        let result = validation
            .map_err(StoreError::from)
            .and_then(|()| apply_changes(&mut self.conn, &changes));

        match &result {
            Ok(()) => info!(
                "event=store_commit module=store status=ok backend=sqlite changes={} duration_ms={}",
                changes.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_commit module=store status=error backend=sqlite discarded_changes={} duration_ms={} error={err}",
                changes.len(),
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn has_pending_changes(&self) -> bool {
        !self.staged.is_empty()
    }
}

fn apply_changes(conn: &mut Connection, changes: &[StagedChange]) -> StoreResult<()> {
    let tx = conn.transaction()?;
    for change in changes {
        apply_change(&tx, change)?;
    }
    tx.commit()?;
    Ok(())
}

fn apply_change(tx: &Transaction<'_>, change: &StagedChange) -> StoreResult<()> {
    match change {
        StagedChange::Insert { task, position } => {
            tx.execute(
                "INSERT INTO tasks (uuid, title, position) VALUES (?1, ?2, ?3);",
                params![task.id.to_string(), task.title.as_str(), position],
            )?;
        }
        StagedChange::Rename { id, title } => {
            let changed = tx.execute(
                "UPDATE tasks
                 SET
                    title = ?1,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?2;",
                params![title.as_str(), id.to_string()],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(*id));
            }
        }
        StagedChange::Delete(id) => {
            let changed = tx.execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;
            if changed == 0 {
                return Err(StoreError::NotFound(*id));
            }
        }
    }
    Ok(())
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in tasks.uuid"))
    })?;

    let task = Task::with_id(id, row.get::<_, String>("title")?);
    task.validate()?;
    Ok(task)
}
