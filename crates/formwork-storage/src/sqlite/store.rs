//! [`SqliteStore`]: SQLite-backed schema storage.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::sqlite::schema::{CURRENT_SCHEMA_VERSION, MIGRATIONS};

const IN_MEMORY: &str = ":memory:";

/// SQLite-backed implementation of [`SchemaStore`](crate::traits::SchemaStore).
///
/// The connection sits behind a `Mutex` so the store is `Send + Sync`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (or creates) a database file and brings it to the current layout.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening schema database");
        let conn = Connection::open(path)
            .map_err(|e| StorageError::open(path.display().to_string(), e))?;
        Self::from_connection(conn, Some(path.to_path_buf()))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        debug!("opening in-memory schema database");
        let conn = Connection::open_in_memory().map_err(|e| StorageError::open(IN_MEMORY, e))?;
        Self::from_connection(conn, None)
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        let location = path
            .as_ref()
            .map_or_else(|| IN_MEMORY.to_string(), |p| p.display().to_string());
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")
            .map_err(|e| StorageError::open(location, e))?;

        let store = Self {
            conn: Mutex::new(conn),
            path,
        };
        store.migrate()?;
        Ok(store)
    }

    /// The database file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Layout version recorded in the database.
    pub fn schema_version(&self) -> Result<i32> {
        let conn = self.lock_conn()?;
        Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
    }

    /// Runs every migration newer than the recorded version, each in its own
    /// transaction.
    fn migrate(&self) -> Result<()> {
        let found = self.schema_version()?;
        if found > CURRENT_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        let mut conn = self.lock_conn()?;
        for (index, sql) in MIGRATIONS.iter().enumerate().skip(found.max(0) as usize) {
            let version = index as i32 + 1;
            let step = |conn: &mut Connection| -> rusqlite::Result<()> {
                let tx = conn.transaction()?;
                tx.execute_batch(sql)?;
                tx.pragma_update(None, "user_version", version)?;
                tx.commit()
            };
            step(&mut *conn).map_err(|source| StorageError::Migration { version, source })?;
            info!(version, "migrated schema database");
        }
        Ok(())
    }

    pub(crate) fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Poisoned("connection"))
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
