//! Embedded query engine handle.
//!
//! # Responsibility
//! - Own the process' in-memory SQLite connections (main and read-only).
//! - Create each connection lazily, at most once, on first use.
//!
//! # Invariants
//! - Concurrent first use from several threads yields exactly one
//!   connection per role (`OnceCell::get_or_try_init`).
//! - A failed initialization leaves the cell empty so a later call retries.
//! - Connections are handed out behind a `Mutex`; callers hold the guard
//!   only for the duration of one load+query.

use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

mod open;

pub use open::{open_in_memory, ConnectionRole};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// A thread panicked while holding the connection.
    Poisoned,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "database connection lock poisoned"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Poisoned => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Lazily initialized engine connections, shared through `Arc`.
#[derive(Debug, Default)]
pub struct Database {
    main: OnceCell<Mutex<Connection>>,
    read_only: OnceCell<Mutex<Connection>>,
    opened: AtomicUsize,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the main connection, opening it on first call.
    pub fn connection(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.acquire(&self.main, ConnectionRole::Main)
    }

    /// Returns the read-only connection used for user SQL.
    pub fn read_only_connection(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.acquire(&self.read_only, ConnectionRole::ReadOnly)
    }

    /// Whether the main connection has been opened yet.
    pub fn is_initialized(&self) -> bool {
        self.main.get().is_some()
    }

    /// Number of connections opened by this handle so far.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    fn acquire<'a>(
        &'a self,
        cell: &'a OnceCell<Mutex<Connection>>,
        role: ConnectionRole,
    ) -> DbResult<MutexGuard<'a, Connection>> {
        let conn = cell.get_or_try_init(|| {
            let conn = open_in_memory(role)?;
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok::<_, DbError>(Mutex::new(conn))
        })?;
        conn.lock().map_err(|_| DbError::Poisoned)
    }
}
