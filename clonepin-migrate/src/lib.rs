//! Console front-ends for the ClonePinterest maintenance procedures.
//!
//! Each `run_*` function prints human-readable progress to stdout and returns
//! the process exit status. Diagnostics go through `tracing` to stderr.

use anyhow::{Context, Result};
use clap::Args;
use clonepin_db::db::introspect::{inspect_schema, SchemaReport};
use clonepin_db::{
    add_parent_comment_column, provision_follows_with, Database, MaintenanceError,
    MigrationOutcome, ProvisionStep, Settings,
};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Options shared by every tool. All are optional; without them the tools
/// use `settings.toml`, the environment and finally the built-in defaults.
#[derive(Args, Debug, Default)]
pub struct ToolArgs {
    /// Path to the SQLite database file
    #[arg(short, long)]
    pub database: Option<String>,

    /// DDL batch for the parent-comment migration (defaults to the bundled one)
    #[arg(short, long)]
    pub script: Option<String>,
}

/// Outcome of a tool run, mapped onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::from(1),
        }
    }
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clonepin_db=warn,clonepin_migrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Resolve settings from `.env`, `settings.toml`, the environment and `args`.
pub fn load_settings(args: ToolArgs) -> Result<Settings> {
    dotenv::dotenv().ok();

    let settings = Settings::new().context("Failed to load settings")?;
    Ok(settings.with_overrides(args.database, args.script))
}

/// Load settings and report failures the same way the tools report
/// everything else.
pub fn settings_or_exit(args: ToolArgs) -> std::result::Result<Settings, ExitCode> {
    load_settings(args).map_err(|e| {
        eprintln!("Error: {:#}", e);
        Exit::Failure.into()
    })
}

fn finish(result: io::Result<Exit>) -> ExitCode {
    match result {
        Ok(exit) => exit.into(),
        Err(e) => {
            tracing::error!(error = %e, "failed to write output");
            Exit::Failure.into()
        }
    }
}

pub fn run_create_follow_table(settings: &Settings) -> ExitCode {
    finish(create_follow_table(settings, &mut io::stdout().lock()))
}

pub fn run_add_parent_comment_id(settings: &Settings) -> ExitCode {
    finish(add_parent_comment_id(settings, &mut io::stdout().lock()))
}

pub fn run_inspect(settings: &Settings, json: bool) -> ExitCode {
    finish(inspect(settings, json, &mut io::stdout().lock()))
}

/// Both procedures in order, stopping at the first failure.
pub fn run_all(settings: &Settings) -> ExitCode {
    let mut out = io::stdout().lock();
    finish(create_follow_table(settings, &mut out).and_then(|exit| match exit {
        Exit::Success => add_parent_comment_id(settings, &mut out),
        Exit::Failure => Ok(exit),
    }))
}

/// Provision the `Follows` table and its unique index.
pub fn create_follow_table<W: Write>(settings: &Settings, out: &mut W) -> io::Result<Exit> {
    let path = settings.database_path();

    let db = match Database::open_existing(&path) {
        Ok(db) => db,
        Err(MaintenanceError::DatabaseNotFound(_)) => {
            writeln!(out, "Ошибка: База данных {} не найдена!", path.display())?;
            return Ok(Exit::Failure);
        }
        Err(e) => {
            writeln!(out, "Ошибка: {}", e)?;
            return Ok(Exit::Failure);
        }
    };

    let mut write_error = None;
    let result = db.connection().and_then(|mut conn| {
        provision_follows_with(&mut conn, |step| {
            let message = match step {
                ProvisionStep::CreateTable => "Создание таблицы Follows...",
                ProvisionStep::CreateIndex => "Создание индекса...",
            };
            if let Err(e) = writeln!(out, "{}", message) {
                write_error.get_or_insert(e);
            }
        })
    });
    if let Some(e) = write_error {
        return Err(e);
    }

    match result {
        Ok(report) => {
            tracing::debug!(?report, "provisioning finished");
            writeln!(out, "✓ Таблица Follows успешно создана!")?;
            writeln!(out, "✓ Индекс успешно создан!")?;
            Ok(Exit::Success)
        }
        Err(e) => {
            writeln!(out, "Ошибка: {}", e)?;
            Ok(Exit::Failure)
        }
    }
}

/// Add `Comments.ParentCommentId`; an existing column counts as success.
pub fn add_parent_comment_id<W: Write>(settings: &Settings, out: &mut W) -> io::Result<Exit> {
    let path = settings.database_path();

    let db = match Database::open_existing(&path) {
        Ok(db) => db,
        Err(MaintenanceError::DatabaseNotFound(_)) => {
            writeln!(out, "Database file not found at {}", path.display())?;
            return Ok(Exit::Failure);
        }
        Err(e) => {
            writeln!(out, "Error: {}", e)?;
            return Ok(Exit::Failure);
        }
    };

    let result = settings.script_source().load().and_then(|script| {
        let mut conn = db.connection()?;
        add_parent_comment_column(&mut conn, &script)
    });

    match result {
        Ok(MigrationOutcome::Applied) => {
            writeln!(out, "Successfully added ParentCommentId column to Comments table")?;
            Ok(Exit::Success)
        }
        Ok(MigrationOutcome::AlreadyApplied) => {
            writeln!(out, "Column ParentCommentId already exists")?;
            Ok(Exit::Success)
        }
        Err(e) => {
            writeln!(out, "Error: {}", e)?;
            Ok(Exit::Failure)
        }
    }
}

/// Report the state of the schema objects the tools manage.
pub fn inspect<W: Write>(settings: &Settings, json: bool, out: &mut W) -> io::Result<Exit> {
    let path = settings.database_path();

    let report = Database::open_existing(&path)
        .and_then(|db| db.connection())
        .and_then(|conn| inspect_schema(&conn));

    let report = match report {
        Ok(report) => report,
        Err(MaintenanceError::DatabaseNotFound(_)) => {
            writeln!(out, "❌ Database file not found: {}", path.display())?;
            return Ok(Exit::Failure);
        }
        Err(e) => {
            writeln!(out, "❌ Error: {}", e)?;
            return Ok(Exit::Failure);
        }
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write_report(out, &path.display().to_string(), &report)?;
    }

    Ok(Exit::Success)
}

fn write_report<W: Write>(out: &mut W, database: &str, report: &SchemaReport) -> io::Result<()> {
    writeln!(out, "ClonePinterest Database Schema Inspector")?;
    writeln!(out, "========================================")?;
    writeln!(out)?;
    writeln!(out, "Database: {}", database)?;
    writeln!(out)?;

    writeln!(out, "Tables:")?;
    writeln!(out, "-------")?;
    for table in &report.tables {
        match table.rows {
            Some(rows) if table.exists => writeln!(out, "  ✓ {} ({} records)", table.name, rows)?,
            _ => writeln!(out, "  ❌ {} (MISSING)", table.name)?,
        }
        for col in &table.columns {
            let pk_marker = if col.pk { " (PRIMARY KEY)" } else { "" };
            let null_marker = if col.not_null { " NOT NULL" } else { "" };
            writeln!(out, "      - {} : {}{}{}", col.name, col.type_name, null_marker, pk_marker)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Indexes:")?;
    writeln!(out, "--------")?;
    for index in &report.indexes {
        if index.exists {
            let unique = if index.unique { " (UNIQUE)" } else { "" };
            writeln!(out, "  ✓ {}{}", index.name, unique)?;
        } else {
            writeln!(out, "  ❌ {} (MISSING)", index.name)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Summary:")?;
    writeln!(out, "--------")?;
    if report.follows_provisioned {
        writeln!(out, "✓ Follows table provisioned")?;
    } else {
        writeln!(out, "❌ Follows table missing - run create-follow-table")?;
    }
    if report.parent_comment_column {
        writeln!(out, "✓ Comments.ParentCommentId present")?;
    } else {
        writeln!(out, "❌ Comments.ParentCommentId missing - run add-parent-comment-id")?;
    }

    Ok(())
}
