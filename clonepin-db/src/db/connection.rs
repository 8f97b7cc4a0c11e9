use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::path::Path;
use std::time::Duration;

use crate::error::{MaintenanceError, Result};

/// SQLite in-memory database identifier
const MEMORY_DB_PATH: &str = ":memory:";

/// The tools do one batch of work per run, so a single connection is enough.
const POOL_SIZE: u32 = 1;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling support
#[derive(Clone)]
pub struct Database {
    pub pool: DbPool,
}

impl Database {
    /// Open a database, creating the file if it does not exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manager = Self::create_connection_manager(path, OpenFlags::default());
        Self::from_manager(manager)
    }

    /// Open a database that must already exist.
    ///
    /// Fails with [`MaintenanceError::DatabaseNotFound`] before touching the
    /// filesystem if the file is absent. The file is opened without
    /// `SQLITE_OPEN_CREATE`, so a file removed in between is still not created.
    pub fn open_existing<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(MaintenanceError::DatabaseNotFound(path.to_path_buf()));
        }

        let mut flags = OpenFlags::default();
        flags.remove(OpenFlags::SQLITE_OPEN_CREATE);

        tracing::debug!(path = %path.display(), "opening existing database");
        let manager = Self::create_connection_manager(path, flags);
        Self::from_manager(manager)
    }

    /// Create an in-memory database pool (useful for testing)
    pub fn in_memory() -> Result<Self> {
        Self::new(MEMORY_DB_PATH)
    }

    /// Create appropriate connection manager based on path
    ///
    /// # Arguments
    /// * `path` - Database file path or ":memory:" for in-memory database
    /// * `flags` - Open flags used for file databases
    fn create_connection_manager<P: AsRef<Path>>(
        path: P,
        flags: OpenFlags,
    ) -> SqliteConnectionManager {
        let path_str = path.as_ref().to_string_lossy();
        let trimmed_path = path_str.trim();

        let manager = if trimmed_path.eq_ignore_ascii_case(MEMORY_DB_PATH) {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(path).with_flags(flags)
        };

        // ON DELETE CASCADE on Follows only fires with enforcement enabled.
        manager.with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"))
    }

    fn from_manager(manager: SqliteConnectionManager) -> Result<Self> {
        let pool = Pool::builder()
            .max_size(POOL_SIZE)
            .connection_timeout(CONNECTION_TIMEOUT)
            .build(manager)?;
        Ok(Self { pool })
    }

    /// Get a connection from the pool
    pub fn connection(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_existing_rejects_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clonepinterest.db");

        let result = Database::open_existing(&path);

        assert!(matches!(result, Err(MaintenanceError::DatabaseNotFound(p)) if p == path));
        assert!(!path.exists(), "missing database must not be created");
    }

    #[test]
    fn test_open_existing_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = Database::open_existing(temp_dir.path());

        assert!(matches!(result, Err(MaintenanceError::DatabaseNotFound(_))));
    }

    #[test]
    fn test_open_existing_reads_file_created_by_new() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clonepinterest.db");

        {
            let db = Database::new(&path).expect("Failed to create database");
            let conn = db.connection().expect("Failed to get connection");
            conn.execute_batch("CREATE TABLE marker (id INTEGER PRIMARY KEY);")
                .expect("Failed to create table");
        }

        let db = Database::open_existing(&path).expect("Failed to open database");
        let conn = db.connection().expect("Failed to get connection");
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='marker'",
                [],
                |row| row.get(0),
            )
            .expect("Failed to query schema");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::in_memory().expect("Failed to create database");
        let conn = db.connection().expect("Failed to get connection");

        let enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .expect("Failed to read pragma");

        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_memory_database_detection() {
        let memory_paths = [":memory:", " :memory: ", ":MEMORY:", " :Memory: "];

        for path in &memory_paths {
            let db = Database::new(path).expect("Failed to create memory database");
            let conn = db.connection().expect("Failed to get connection");
            conn.execute_batch("CREATE TABLE t (id INTEGER);")
                .expect("Failed to create table");
        }
    }
}
