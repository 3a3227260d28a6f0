//! Command-line driver for the task list core.
//!
//! # Responsibility
//! - Run list/add/rename/delete against a local task database.
//! - Keep `ping` as a quick linkage probe independent of any database.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tasklist_core::db::open_db;
use tasklist_core::{
    default_log_level, init_logging, ConfirmOutcome, RowMirror, SqliteTaskStore,
    TaskListController,
};

const DEFAULT_DB_FILE: &str = "tasklist.sqlite3";

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Local to-do list")]
struct Cli {
    /// Task database file.
    #[arg(long, env = "TASKLIST_DB_PATH", global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "TASKLIST_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage info.
    Ping,
    /// Show every task with its row number.
    List,
    /// Append a new task.
    Add { text: String },
    /// Retitle the task at ROW.
    Rename { row: usize, text: String },
    /// Remove the task at ROW.
    Delete { row: usize },
}

type CliController = TaskListController<SqliteTaskStore, RowMirror>;

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let command = match cli.command {
        Command::Ping => {
            println!("tasklist_core ping={}", tasklist_core::ping());
            println!("tasklist_core version={}", tasklist_core::core_version());
            return Ok(());
        }
        command => command,
    };

    let db_path = cli.db.unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
    let mut controller = open_controller(&db_path)?;

    match command {
        Command::Ping | Command::List => {}
        Command::Add { text } => {
            let intent = controller.begin_add().intent;
            let outcome = controller.confirm(&text, intent);
            report_confirm(&controller, outcome);
        }
        Command::Rename { row, text } => {
            let prompt = controller
                .begin_update(row)
                .ok_or_else(|| out_of_range(row, controller.row_count()))?;
            let outcome = controller.confirm(&text, prompt.intent);
            report_confirm(&controller, outcome);
        }
        Command::Delete { row } => {
            if row >= controller.row_count() {
                return Err(out_of_range(row, controller.row_count()));
            }
            let outcome = controller.delete(row);
            warn_if_unsaved(&controller, outcome.persisted);
        }
    }

    print_rows(&controller);
    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let Some(log_dir) = &cli.log_dir else {
        return Ok(());
    };
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| anyhow!("log dir `{}` is not valid UTF-8", log_dir.display()))?;
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, log_dir).map_err(|err| anyhow!(err))
}

fn open_controller(db_path: &Path) -> Result<CliController> {
    let conn = open_db(db_path)
        .with_context(|| format!("failed to open task database `{}`", db_path.display()))?;
    let store = SqliteTaskStore::try_new(conn).context("failed to read task table")?;
    let mut controller = TaskListController::new(store, RowMirror::new());
    controller.load();
    if let Some(err) = controller.last_error() {
        bail!("{err}");
    }
    Ok(controller)
}

fn report_confirm(controller: &CliController, outcome: ConfirmOutcome) {
    match outcome {
        ConfirmOutcome::Dismissed => eprintln!("nothing to save: text is blank"),
        ConfirmOutcome::Created { persisted, .. } | ConfirmOutcome::Renamed { persisted, .. } => {
            warn_if_unsaved(controller, persisted);
        }
    }
}

fn warn_if_unsaved(controller: &CliController, persisted: bool) {
    if persisted {
        return;
    }
    match controller.last_error() {
        Some(err) => eprintln!("warning: change was not saved: {err}"),
        None => eprintln!("warning: change was not saved"),
    }
}

fn out_of_range(row: usize, rows: usize) -> anyhow::Error {
    anyhow!("row {row} out of range ({rows} rows)")
}

fn print_rows(controller: &CliController) {
    if controller.row_count() == 0 {
        println!("(no tasks)");
        return;
    }
    let width = controller.row_count().to_string().len();
    for (index, title) in controller.view().rows().iter().enumerate() {
        println!("{index:>width$}  {title}");
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rename_parses_row_and_text() {
        let cli = Cli::try_parse_from(["tasklist", "rename", "2", "Buy oat milk"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Rename { row: 2, ref text } if text == "Buy oat milk"
        ));
    }
}
