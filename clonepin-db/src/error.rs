use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MaintenanceError>;

/// Failures of the maintenance procedures.
///
/// A migration that finds its column already present is not an error; see
/// [`crate::migrate::MigrationOutcome::AlreadyApplied`].
#[derive(Debug, Error)]
pub enum MaintenanceError {
    /// The database file is missing. Raised before any connection is opened.
    #[error("database file not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to acquire database connection: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("failed to read migration script {}: {source}", .path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MaintenanceError {
    /// True for SQLite constraint violations (unique index, foreign key, ...).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            MaintenanceError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
