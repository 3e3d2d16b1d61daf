//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees
//! that migrations have run before any other operation.  A failed migration
//! is fatal to the opening flow: it is logged and returned as
//! [`StoreError::Migration`], and no handle escapes.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// A [`Database`] shared between the owner task and collection factories.
///
/// The SQLite connection is not assumed safe for concurrent writers, so
/// every call path locks the mutex for the duration of one statement.  No
/// lock is held across an await point.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data
    /// directory:
    /// - Linux:   `~/.local/share/hangar/hangar.db`
    /// - macOS:   `~/Library/Application Support/io.hangar.hangar/hangar.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\hangar\hangar\data\hangar.db`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("io", "hangar", "hangar").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("hangar.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Recommended SQLite settings.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Self::finish_open(conn)
    }

    /// Open an in-memory database.  Used by tests and ephemeral embedders;
    /// the content is gone when the handle is dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Self::finish_open(conn)
    }

    fn finish_open(conn: Connection) -> Result<Self> {
        if let Err(e) = migrations::run_migrations(&conn) {
            tracing::error!(error = %e, "database schema migration failed");
            return Err(e);
        }

        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed CRUD helpers, but direct access is
    /// occasionally needed for transactions or ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return a mutable reference to the underlying connection.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }

    /// Wrap this handle for shared use by collections and the sync runtime.
    pub fn into_shared(self) -> SharedDatabase {
        Arc::new(Mutex::new(self))
    }
}
