//! Database connection management.
//!
//! Opens `SQLite` with the PRAGMA settings that several staff terminals
//! sharing one database file need.

use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;

/// A database connection wrapper with configuration.
///
/// # Examples
///
/// ```no_run
/// use tabling::database::{Database, DatabaseConfig};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/tabling.db")).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// Creates the parent directory when `auto_create` is set, switches the
    /// journal to WAL, applies the busy timeout, and initializes or verifies
    /// the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataDirectoryNotFound`] if the file is missing and
    /// auto-create is off, or any error from opening, PRAGMAs, or the schema
    /// check.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if !config.path.exists() {
            if config.auto_create {
                if let Some(parent) = config.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
            } else {
                return Err(Error::DataDirectoryNotFound {
                    path: config
                        .path
                        .parent()
                        .map_or_else(|| config.path.clone(), std::path::Path::to_path_buf),
                });
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // Busy timeout first, so the WAL switch itself waits on other terminals
        conn.busy_timeout(config.busy_timeout)?;
        if !config.read_only {
            let _: String = conn
                .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
                .map_err(|e| Error::from_sqlite(e, config.busy_timeout))?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;

        super::migrations::check_schema_compatibility(&conn)
            .map_err(|e| match e {
                Error::Database(inner) => Error::from_sqlite(inner, config.busy_timeout),
                other => other,
            })?;

        log::debug!("opened database at {}", config.path.display());
        Ok(Self { conn, config })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying `SQLite` connection.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Returns the configuration the database was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Returns the configured busy timeout.
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        self.config.busy_timeout
    }
}
