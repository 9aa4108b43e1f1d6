//! `DuckDB` connection handling for the modifier store.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use ::duckdb::Connection;

/// Hands out connections to a single `DuckDB` database instance.
///
/// Every connection is cloned from one primary handle so they all share the same
/// database instance and file lock. Idle connections are kept for reuse up to
/// `max_idle`.
#[derive(Debug)]
pub struct ConnectionManager {
    db_path: Option<PathBuf>,
    primary: Connection,
    max_idle: usize,
    idle: Mutex<Vec<Connection>>,
}

impl ConnectionManager {
    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or configured.
    pub fn open(path: impl Into<PathBuf>, max_idle: usize) -> Result<Self, ::duckdb::Error> {
        let path = path.into();
        let primary = Connection::open(path.as_path())?;
        configure_connection(&primary)?;
        Ok(Self {
            db_path: Some(path),
            primary,
            max_idle: max_idle.max(1),
            idle: Mutex::new(Vec::new()),
        })
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns an error if `DuckDB` cannot allocate the database.
    pub fn open_in_memory(max_idle: usize) -> Result<Self, ::duckdb::Error> {
        let primary = Connection::open_in_memory()?;
        configure_connection(&primary)?;
        Ok(Self {
            db_path: None,
            primary,
            max_idle: max_idle.max(1),
            idle: Mutex::new(Vec::new()),
        })
    }

    /// Borrow a connection for the lifetime of the returned guard.
    ///
    /// # Errors
    /// Returns an error if a new connection cannot be cloned from the primary handle.
    pub fn acquire(&self) -> Result<ConnectionGuard<'_>, ::duckdb::Error> {
        let reused = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();

        let connection = match reused {
            Some(connection) => connection,
            None => {
                let connection = self.primary.try_clone()?;
                configure_connection(&connection)?;
                connection
            }
        };

        Ok(ConnectionGuard {
            manager: self,
            connection: Some(connection),
        })
    }

    /// Path of the backing file, `None` for in-memory databases.
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn release(&self, connection: Connection) {
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.max_idle {
            idle.push(connection);
        }
    }
}

/// A borrowed connection that goes back to its manager on drop.
pub struct ConnectionGuard<'a> {
    manager: &'a ConnectionManager,
    connection: Option<Connection>,
}

impl Deref for ConnectionGuard<'_> {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        match self.connection.as_ref() {
            Some(connection) => connection,
            // Only `Drop` takes the connection out.
            None => unreachable!("connection guard used after release"),
        }
    }
}

impl Drop for ConnectionGuard<'_> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            self.manager.release(connection);
        }
    }
}

fn configure_connection(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch("PRAGMA disable_progress_bar;")
}
