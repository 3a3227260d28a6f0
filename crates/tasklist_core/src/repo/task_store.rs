//! Task store contract and error model.
//!
//! # Responsibility
//! - Describe the four-operation store the controller depends on, plus the
//!   explicit `update` used instead of mutating shared records.
//!
//! # Invariants
//! - `create`, `update` and `delete` only stage changes; nothing is durable
//!   until `commit` returns `Ok`.
//! - A failed `commit` discards every staged change and leaves durable state
//!   untouched.
//! - `commit` with nothing staged succeeds without side effects.

use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for task fetch and commit operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
    /// Backend refused the operation (I/O failure, read-only media).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::Unavailable(message) => write!(f, "task store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Transactional object store for task records.
pub trait TaskStore {
    /// Returns durable records in store-native (insertion) order.
    fn fetch_all(&self) -> StoreResult<Vec<Task>>;

    /// Allocates a new untitled record; its title must be set before commit.
    fn create(&mut self) -> Task;

    /// Stages a title change for `id`.
    fn update(&mut self, id: TaskId, title: &str);

    /// Stages removal of `id`.
    fn delete(&mut self, id: TaskId);

    /// Flushes staged changes to durable storage.
    fn commit(&mut self) -> StoreResult<()>;

    /// Whether any staged change awaits commit.
    fn has_pending_changes(&self) -> bool;
}
