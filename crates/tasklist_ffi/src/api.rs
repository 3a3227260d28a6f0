//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the task list screen's operations to Dart via FRB.
//! - Hold the single process-wide controller behind a mutex.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary; row indices are
//!   bounds-checked before they reach the controller.
//! - Confirm and delete calls are serialized by the controller mutex, so
//!   overlapping dialog dismissals cannot desynchronize row indices.

use log::{error, warn};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tasklist_core::db::open_db;
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ConfirmOutcome, DeleteOutcome, PromptIntent, RowMirror, SqliteTaskStore, TaskListController,
    TaskListView, TaskPrompt, TaskStore,
};
use uuid::Uuid;

const TASK_DB_FILE_NAME: &str = "tasklist.sqlite3";
const TASK_DB_PATH_ENV: &str = "TASKLIST_DB_PATH";

type FfiController = TaskListController<SqliteTaskStore, RowMirror>;

static TASK_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static TASK_LIST: OnceLock<Mutex<Option<FfiController>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    /// Stable task ID in string form.
    pub task_id: String,
    pub title: String,
}

/// Full list state for (re)building the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListSnapshot {
    pub rows: Vec<TaskRow>,
    /// Diagnostics only; empty when the list reflects the store.
    pub message: String,
}

/// Prompt presentation data for the add/update dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPromptView {
    pub title: String,
    pub message: String,
    pub placeholder: String,
    pub action_label: String,
    pub cancel_label: String,
    pub initial_text: String,
    /// Bound task for update prompts; pass back to `task_list_confirm`.
    pub task_id: Option<String>,
}

/// Result envelope for confirm/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the call was accepted.
    pub ok: bool,
    /// Whether rows changed; `false` for blank-text confirms.
    pub changed: bool,
    pub task_id: Option<String>,
    pub row_index: Option<u32>,
    /// Whether the change reached durable storage. Rows are not reverted
    /// when this is `false`.
    pub persisted: bool,
    pub message: String,
}

impl TaskActionResponse {
    fn applied(message: &str, task_id: Uuid, row_index: usize, persisted: bool) -> Self {
        Self {
            ok: true,
            changed: true,
            task_id: Some(task_id.to_string()),
            row_index: u32::try_from(row_index).ok(),
            persisted,
            message: if persisted {
                message.to_string()
            } else {
                format!("{message} Saving failed; see logs.")
            },
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed: false,
            task_id: None,
            row_index: None,
            persisted: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            task_id: None,
            row_index: None,
            persisted: false,
            message: message.into(),
        }
    }
}

/// Reloads the list from the database and returns every row.
///
/// # FFI contract
/// - Call once when the list screen appears.
/// - Fetch failure yields an empty list plus a diagnostic message.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_load() -> TaskListSnapshot {
    match lock_controller(false, |controller| {
        controller.load();
        snapshot(controller)
    }) {
        Ok(snapshot) => snapshot,
        Err(err) => TaskListSnapshot {
            rows: Vec::new(),
            message: format!("task_list_load failed: {err}"),
        },
    }
}

/// Returns the current rows without touching the database.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_rows() -> TaskListSnapshot {
    with_controller(|controller| snapshot(controller)).unwrap_or_else(|err| TaskListSnapshot {
        rows: Vec::new(),
        message: format!("task_list_rows failed: {err}"),
    })
}

/// Prompt data for the "+" button.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_begin_add() -> TaskPromptView {
    to_prompt_view(TaskPrompt::add())
}

/// Prompt data for a tapped row; `None` when the row no longer exists.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_begin_update(row_index: u32) -> Option<TaskPromptView> {
    with_controller(|controller| controller.begin_update(row_index as usize))
        .ok()
        .flatten()
        .map(to_prompt_view)
}

/// Applies dialog text: creates a task, or renames `task_id` when given.
///
/// # FFI contract
/// - Blank text returns `ok=true, changed=false`.
/// - Malformed `task_id` returns `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_confirm(text: String, task_id: Option<String>) -> TaskActionResponse {
    let intent = match task_id.as_deref().map(str::trim) {
        None | Some("") => PromptIntent::Create,
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => PromptIntent::Rename(id),
            Err(_) => {
                return TaskActionResponse::failure(format!(
                    "task_list_confirm failed: invalid task_id `{raw}`"
                ))
            }
        },
    };

    match with_controller(|controller| controller.confirm(&text, intent)) {
        Ok(ConfirmOutcome::Dismissed) => TaskActionResponse::unchanged("Nothing to save."),
        Ok(ConfirmOutcome::Created {
            index,
            task_id,
            persisted,
        }) => TaskActionResponse::applied("Task created.", task_id, index, persisted),
        Ok(ConfirmOutcome::Renamed {
            index,
            task_id,
            persisted,
        }) => TaskActionResponse::applied("Task updated.", task_id, index, persisted),
        Err(err) => TaskActionResponse::failure(format!("task_list_confirm failed: {err}")),
    }
}

/// Deletes the swiped row.
///
/// # FFI contract
/// - Out-of-range `row_index` returns `ok=false` instead of panicking.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list_delete(row_index: u32) -> TaskActionResponse {
    let index = row_index as usize;
    let result = with_controller(|controller| {
        if index >= controller.row_count() {
            warn!(
                "event=ffi_delete module=ffi status=rejected row={index} rows={}",
                controller.row_count()
            );
            return Err(format!(
                "row {index} out of range for {} rows",
                controller.row_count()
            ));
        }
        Ok(controller.delete(index))
    });

    match result.and_then(|outcome| outcome) {
        Ok(DeleteOutcome {
            index,
            task,
            persisted,
        }) => TaskActionResponse::applied("Task deleted.", task.id, index, persisted),
        Err(err) => TaskActionResponse::failure(format!("task_list_delete failed: {err}")),
    }
}

fn resolve_task_db_path() -> PathBuf {
    TASK_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(TASK_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(TASK_DB_FILE_NAME)
        })
        .clone()
}

fn with_controller<T>(f: impl FnOnce(&mut FfiController) -> T) -> Result<T, String> {
    lock_controller(true, f)
}

/// Runs `f` on the shared controller, opening it on first use.
///
/// `load_on_open = false` is for callers that load themselves, so a first
/// call does not fetch twice.
fn lock_controller<T>(
    load_on_open: bool,
    f: impl FnOnce(&mut FfiController) -> T,
) -> Result<T, String> {
    let slot = TASK_LIST.get_or_init(|| Mutex::new(None));
    let mut guard = slot
        .lock()
        .map_err(|_| "task list state poisoned by an earlier panic".to_string())?;

    let controller =
        ensure_controller(&mut *guard, open_controller, load_on_open).map_err(|err| {
            error!("event=ffi_controller_init module=ffi status=error error={err}");
            err
        })?;
    Ok(f(controller))
}

fn ensure_controller<S: TaskStore, V: TaskListView>(
    slot: &mut Option<TaskListController<S, V>>,
    open: impl FnOnce() -> Result<TaskListController<S, V>, String>,
    load_on_open: bool,
) -> Result<&mut TaskListController<S, V>, String> {
    if slot.is_none() {
        let mut controller = open()?;
        if load_on_open {
            controller.load();
        }
        *slot = Some(controller);
    }
    slot.as_mut()
        .ok_or_else(|| "task list controller unavailable".to_string())
}

fn open_controller() -> Result<FfiController, String> {
    let conn =
        open_db(resolve_task_db_path()).map_err(|err| format!("task DB open failed: {err}"))?;
    let store =
        SqliteTaskStore::try_new(conn).map_err(|err| format!("task store init failed: {err}"))?;
    Ok(TaskListController::new(store, RowMirror::new()))
}

fn snapshot(controller: &FfiController) -> TaskListSnapshot {
    TaskListSnapshot {
        rows: controller
            .tasks()
            .iter()
            .map(|task| TaskRow {
                task_id: task.id.to_string(),
                title: task.title.clone(),
            })
            .collect(),
        message: controller
            .last_error()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

fn to_prompt_view(prompt: TaskPrompt) -> TaskPromptView {
    TaskPromptView {
        title: prompt.title.to_string(),
        message: prompt.message.to_string(),
        placeholder: prompt.placeholder.to_string(),
        action_label: prompt.action_label.to_string(),
        cancel_label: prompt.cancel_label.to_string(),
        initial_text: prompt.initial_text,
        task_id: prompt.intent.bound_task().map(|id| id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, ensure_controller, init_logging, ping, task_list_begin_add,
        task_list_begin_update, task_list_confirm, task_list_delete, task_list_load,
        task_list_rows,
    };
    use tasklist_core::{MemoryTaskStore, RowMirror, TaskListController};
    use std::sync::{Mutex, MutexGuard};
    use std::time::{SystemTime, UNIX_EPOCH};

    // Tests addressing rows by index must not interleave with deletes.
    static ROW_INDEX_TESTS: Mutex<()> = Mutex::new(());

    fn row_index_guard() -> MutexGuard<'static, ()> {
        ROW_INDEX_TESTS
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn first_open_for_load_fetches_once() {
        let mut slot = None;
        let controller = ensure_controller(
            &mut slot,
            || Ok(TaskListController::new(MemoryTaskStore::new(), RowMirror::new())),
            false,
        )
        .unwrap();
        assert_eq!(controller.store().fetch_calls(), 0);
        controller.load();
        assert_eq!(controller.store().fetch_calls(), 1);

        let reused = ensure_controller(&mut slot, || Err("reopened".to_string()), true).unwrap();
        assert_eq!(reused.store().fetch_calls(), 1);
        assert_eq!(reused.view().full_reloads(), 1);
    }

    #[test]
    fn first_open_for_other_calls_loads_once() {
        let mut slot = None;
        let controller = ensure_controller(
            &mut slot,
            || Ok(TaskListController::new(MemoryTaskStore::new(), RowMirror::new())),
            true,
        )
        .unwrap();
        assert_eq!(controller.store().fetch_calls(), 1);
    }

    #[test]
    fn begin_add_is_unbound() {
        let prompt = task_list_begin_add();
        assert_eq!(prompt.action_label, "Add");
        assert_eq!(prompt.task_id, None);
        assert!(prompt.initial_text.is_empty());
    }

    #[test]
    fn create_then_update_through_prompt() {
        let _guard = row_index_guard();
        let title = unique_token("ffi-create");
        let created = task_list_confirm(title.clone(), None);
        assert!(created.ok && created.changed, "{}", created.message);
        let row = created.row_index.expect("created row index") as usize;

        let prompt = task_list_begin_update(row as u32).expect("row should exist");
        assert_eq!(prompt.initial_text, title);
        assert_eq!(prompt.task_id, created.task_id);

        let renamed_title = format!("{title}-renamed");
        let renamed = task_list_confirm(renamed_title.clone(), prompt.task_id);
        assert!(renamed.ok && renamed.changed, "{}", renamed.message);
        assert_eq!(renamed.row_index, Some(row as u32));

        let reloaded = task_list_load();
        assert!(reloaded
            .rows
            .iter()
            .any(|item| Some(&item.task_id) == created.task_id.as_ref()
                && item.title == renamed_title));
    }

    #[test]
    fn blank_confirm_changes_nothing() {
        let response = task_list_confirm("   ".to_string(), None);
        assert!(response.ok);
        assert!(!response.changed);
    }

    #[test]
    fn malformed_task_id_is_rejected() {
        let response = task_list_confirm("x".to_string(), Some("nope".to_string()));
        assert!(!response.ok);
        assert!(response.message.contains("invalid task_id"));
    }

    #[test]
    fn delete_removes_row_and_rejects_out_of_range() {
        let _guard = row_index_guard();
        let title = unique_token("ffi-delete");
        let created = task_list_confirm(title, None);
        let created_id = created.task_id.expect("created task id");

        let rows = task_list_rows().rows;
        let index = rows
            .iter()
            .position(|row| row.task_id == created_id)
            .expect("created row should be listed");
        let deleted = task_list_delete(index as u32);
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.task_id, Some(created_id.clone()));
        assert!(!task_list_rows()
            .rows
            .iter()
            .any(|row| row.task_id == created_id));

        let rejected = task_list_delete(u32::MAX);
        assert!(!rejected.ok);
        assert!(rejected.message.contains("out of range"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
