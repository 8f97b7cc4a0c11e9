//! Comment-parent-column migrator.
//!
//! Runs a DDL batch that adds `Comments.ParentCommentId`. The migration is
//! idempotent: if the column is already there (found by schema lookup, or
//! reported by SQLite as a duplicate column while the batch runs) the run is
//! a no-op success.

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::db::introspect::column_exists;
use crate::db::schema::{ADD_PARENT_COMMENT_ID_SQL, COMMENTS_TABLE, PARENT_COMMENT_COLUMN};
use crate::error::{MaintenanceError, Result};

/// SQLite's message when `ALTER TABLE ... ADD COLUMN` names an existing column.
const DUPLICATE_COLUMN_MESSAGE: &str = "duplicate column name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The batch ran and was committed.
    Applied,
    /// The column was already present; nothing changed.
    AlreadyApplied,
}

/// Where the DDL batch comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// The batch shipped with this crate.
    Bundled,
    /// A batch read verbatim from disk.
    File(PathBuf),
}

impl ScriptSource {
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(ScriptSource::Bundled, ScriptSource::File)
    }

    pub fn load(&self) -> Result<Cow<'static, str>> {
        match self {
            ScriptSource::Bundled => Ok(Cow::Borrowed(ADD_PARENT_COMMENT_ID_SQL)),
            ScriptSource::File(path) => fs::read_to_string(path)
                .map(Cow::Owned)
                .map_err(|source| MaintenanceError::Script {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// True if `err` is SQLite refusing to add a column that already exists.
pub fn is_duplicate_column_error(err: &rusqlite::Error) -> bool {
    err.to_string()
        .to_lowercase()
        .contains(DUPLICATE_COLUMN_MESSAGE)
}

/// True if the batch opens its own transaction (`BEGIN ...; COMMIT;`), as
/// generated migration scripts do. Leading comments are skipped.
pub fn manages_own_transaction(script: &str) -> bool {
    let mut rest = script.trim_start();
    loop {
        if let Some(line_comment) = rest.strip_prefix("--") {
            rest = line_comment.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(block_comment) = rest.strip_prefix("/*") {
            rest = block_comment.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            break;
        }
        rest = rest.trim_start();
    }

    rest.get(..5)
        .is_some_and(|keyword| keyword.eq_ignore_ascii_case("begin"))
}

/// Apply `script` to add the parent-comment column.
///
/// A batch without its own transaction control runs inside one transaction.
/// A batch that opens its own runs verbatim on the connection, and a
/// transaction it leaves open on failure is rolled back. Any failure other
/// than a duplicate column is returned.
pub fn add_parent_comment_column(conn: &mut Connection, script: &str) -> Result<MigrationOutcome> {
    if column_exists(conn, COMMENTS_TABLE, PARENT_COMMENT_COLUMN)? {
        tracing::info!("{}.{} already present", COMMENTS_TABLE, PARENT_COMMENT_COLUMN);
        return Ok(MigrationOutcome::AlreadyApplied);
    }

    let result = if manages_own_transaction(script) {
        tracing::debug!("migration batch manages its own transaction");
        run_self_managed(conn, script)
    } else {
        run_in_transaction(conn, script)
    };

    match result {
        Ok(()) => {
            tracing::info!("added {}.{}", COMMENTS_TABLE, PARENT_COMMENT_COLUMN);
            Ok(MigrationOutcome::Applied)
        }
        Err(err) if is_duplicate_column_error(&err) => {
            tracing::info!(error = %err, "migration batch reported existing column");
            Ok(MigrationOutcome::AlreadyApplied)
        }
        Err(err) => {
            tracing::debug!(error = %err, "migration batch failed, rolled back");
            Err(err.into())
        }
    }
}

fn run_in_transaction(conn: &mut Connection, script: &str) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    match tx.execute_batch(script) {
        Ok(()) => tx.commit(),
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

fn run_self_managed(conn: &Connection, script: &str) -> rusqlite::Result<()> {
    match conn.execute_batch(script) {
        // A batch that forgot its COMMIT would otherwise be discarded on close.
        Ok(()) if !conn.is_autocommit() => conn.execute_batch("COMMIT"),
        Ok(()) => Ok(()),
        Err(err) => {
            if !conn.is_autocommit() {
                if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
            }
            Err(err)
        }
    }
}
