//! Note access over the embedded query engine.
//!
//! # Responsibility
//! - Load a notebook's markdown files into the engine's `markdown` table.
//! - Answer search, count and guarded user SQL queries.
//!
//! # Invariants
//! - An accessor only ever reads files under its bound notes root.
//! - User SQL runs on the read-only connection, never the main one.

pub mod accessor;
pub mod frontmatter;
pub mod sql_guard;

use crate::db::DbError;
use crate::strings::slugify;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use accessor::NoteAccessor;
pub use frontmatter::{parse_markdown, ParsedMarkdown};
pub use sql_guard::{validate_sql, SqlGuardError};

pub type NoteResult<T> = Result<T, NoteError>;

/// One result row of a user SQL query, keyed by column name.
pub type SqlRow = BTreeMap<String, Value>;

#[derive(Debug)]
pub enum NoteError {
    Db(DbError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Directory traversal below the notes root failed.
    Walk(walkdir::Error),
    InvalidQuery(SqlGuardError),
}

impl Display for NoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Walk(err) => write!(f, "failed to scan notes: {err}"),
            Self::InvalidQuery(err) => write!(f, "invalid query: {err}"),
        }
    }
}

impl Error for NoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Walk(err) => Some(err),
            Self::InvalidQuery(err) => Some(err),
        }
    }
}

impl From<DbError> for NoteError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for NoteError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<walkdir::Error> for NoteError {
    fn from(value: walkdir::Error) -> Self {
        Self::Walk(value)
    }
}

impl From<SqlGuardError> for NoteError {
    fn from(value: SqlGuardError) -> Self {
        Self::InvalidQuery(value)
    }
}

/// Location of a note file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteFile {
    /// Absolute path.
    pub filepath: String,
    /// Path relative to the notes root, `/`-separated.
    pub relative: String,
}

/// A markdown note as returned by the accessor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    pub file: NoteFile,
    /// Body text with frontmatter removed.
    pub content: String,
    /// Parsed frontmatter.
    pub metadata: Map<String, Value>,
}

impl Note {
    /// `metadata.title` when it is a non-empty string, otherwise the
    /// slugified file stem.
    pub fn display_name(&self) -> String {
        if let Some(title) = self
            .metadata
            .get("title")
            .and_then(Value::as_str)
            .filter(|title| !title.is_empty())
        {
            return title.to_string();
        }

        let file_name = self
            .file
            .relative
            .rsplit('/')
            .next()
            .unwrap_or(self.file.relative.as_str());
        slugify(file_name.strip_suffix(".md").unwrap_or(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteFile};
    use serde_json::{json, Map};

    fn note(relative: &str, metadata: serde_json::Value) -> Note {
        Note {
            file: NoteFile {
                filepath: format!("/nb/{relative}"),
                relative: relative.to_string(),
            },
            content: String::new(),
            metadata: metadata.as_object().cloned().unwrap_or_else(Map::new),
        }
    }

    #[test]
    fn display_name_prefers_title() {
        let note = note("daily/2024-01-01.md", json!({"title": "New Year"}));
        assert_eq!(note.display_name(), "New Year");
    }

    #[test]
    fn display_name_falls_back_to_slugified_stem() {
        assert_eq!(
            note("daily/Meeting Notes.md", json!({})).display_name(),
            "meeting-notes"
        );
        assert_eq!(
            note("Plan.md", json!({"title": ""})).display_name(),
            "plan"
        );
        assert_eq!(
            note("x.md", json!({"title": 42})).display_name(),
            "x"
        );
    }
}
