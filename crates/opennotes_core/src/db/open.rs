//! Connection bootstrap for the in-memory query engine.
//!
//! # Responsibility
//! - Open in-memory SQLite connections.
//! - Create the `markdown` table before returning a usable connection.
//!
//! # Invariants
//! - Returned connections already hold the `markdown` table.
//! - Read-only connections start with `query_only=ON`.

use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::time::{Duration, Instant};

/// Markdown files loaded from a notebook's notes root.
const MARKDOWN_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS markdown (
    filepath TEXT PRIMARY KEY NOT NULL,
    relative TEXT NOT NULL,
    content TEXT NOT NULL,
    metadata TEXT NOT NULL DEFAULT '{}'
);
";

/// Which of the two engine connections is being opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRole {
    /// Loads notebook files and answers built-in search/count queries.
    Main,
    /// Executes user-supplied SQL.
    ReadOnly,
}

impl ConnectionRole {
    fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::ReadOnly => "read_only",
        }
    }
}

/// Opens an in-memory database with the `markdown` schema in place.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_in_memory(role: ConnectionRole) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start role={}",
        role.as_str()
    );

    let conn = match Connection::open_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error role={} duration_ms={} error_code=db_open_failed error={}",
                role.as_str(),
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&conn, role) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok role={} duration_ms={}",
                role.as_str(),
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error role={} duration_ms={} error_code=db_bootstrap_failed error={}",
                role.as_str(),
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &Connection, role: ConnectionRole) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch(MARKDOWN_SCHEMA)?;
    if role == ConnectionRole::ReadOnly {
        conn.execute_batch("PRAGMA query_only = ON;")?;
    }
    Ok(())
}
