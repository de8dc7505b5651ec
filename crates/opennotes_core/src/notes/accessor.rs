//! Note accessor bound to one notes root.

use super::frontmatter::parse_markdown;
use super::sql_guard::validate_sql;
use super::{Note, NoteError, NoteFile, NoteResult, SqlRow};
use crate::db::Database;
use crate::paths::{path_to_string, to_portable_string};
use log::{debug, warn};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use serde_json::{Map, Number, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use walkdir::WalkDir;

const SEARCH_SQL: &str = "SELECT filepath, relative, content, metadata
FROM markdown
WHERE ?1 = ''
   OR instr(lower(content), lower(?1)) > 0
   OR instr(lower(filepath), lower(?1)) > 0
ORDER BY relative ASC";

/// Executes queries over the markdown files under a notes root.
///
/// Cheap to clone; every clone shares the process' [`Database`].
#[derive(Debug, Clone)]
pub struct NoteAccessor {
    db: Arc<Database>,
    root: PathBuf,
}

struct MarkdownFile {
    filepath: String,
    relative: String,
    content: String,
    metadata: String,
}

impl NoteAccessor {
    pub fn new(db: Arc<Database>, root: impl Into<PathBuf>) -> Self {
        Self {
            db,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn database(&self) -> Arc<Database> {
        self.db.clone()
    }

    /// Returns notes whose body or file path contains `query`
    /// (ASCII case-insensitive). An empty query returns every note.
    ///
    /// Ordered by path relative to the notes root.
    pub fn search(&self, query: &str) -> NoteResult<Vec<Note>> {
        let started_at = Instant::now();
        let files = self.collect_files()?;
        let mut conn = self.db.connection()?;
        load_files(&mut conn, &files)?;

        let mut stmt = conn.prepare(SEARCH_SQL)?;
        let mut rows = stmt.query(params![query.trim()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(note_from_row(row)?);
        }

        debug!(
            "event=notes_search module=notes status=ok root={} scanned={} matched={} duration_ms={}",
            self.root.display(),
            files.len(),
            notes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(notes)
    }

    /// Number of markdown files under the notes root.
    pub fn count(&self) -> NoteResult<usize> {
        let files = self.collect_files()?;
        let mut conn = self.db.connection()?;
        load_files(&mut conn, &files)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM markdown;", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Runs a guarded, read-only query against the `markdown` table.
    ///
    /// # Errors
    /// - [`NoteError::InvalidQuery`] when the guard rejects `sql`.
    /// - [`NoteError::Db`] when the engine rejects or fails the query.
    pub fn execute_sql(&self, sql: &str) -> NoteResult<Vec<SqlRow>> {
        if let Err(err) = validate_sql(sql) {
            warn!("event=notes_sql module=notes status=rejected reason={err}");
            return Err(err.into());
        }

        let files = self.collect_files()?;
        let mut conn = self.db.read_only_connection()?;
        conn.execute_batch("PRAGMA query_only = OFF;")?;
        let loaded = load_files(&mut conn, &files);
        conn.execute_batch("PRAGMA query_only = ON;")?;
        loaded?;

        let mut stmt = conn.prepare(sql)?;
        let columns = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = SqlRow::new();
            for (index, column) in columns.iter().enumerate() {
                record.insert(column.clone(), json_from_sql(row.get_ref(index)?));
            }
            out.push(record);
        }

        debug!(
            "event=notes_sql module=notes status=ok root={} rows={}",
            self.root.display(),
            out.len()
        );
        Ok(out)
    }

    fn collect_files(&self) -> NoteResult<Vec<MarkdownFile>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown(path) {
                continue;
            }

            let bytes = std::fs::read(path).map_err(|source| NoteError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => {
                    warn!(
                        "event=notes_load module=notes status=lossy reason=invalid_utf8 path={} error={}",
                        path.display(),
                        err.utf8_error()
                    );
                    String::from_utf8_lossy(err.as_bytes()).into_owned()
                }
            };
            let parsed = parse_markdown(&text);
            let relative = path
                .strip_prefix(&self.root)
                .map(to_portable_string)
                .unwrap_or_else(|_| path_to_string(path));

            files.push(MarkdownFile {
                filepath: path_to_string(path),
                relative,
                content: parsed.body,
                metadata: Value::Object(parsed.metadata).to_string(),
            });
        }
        Ok(files)
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Replaces the `markdown` table contents with `files` in one transaction.
fn load_files(conn: &mut Connection, files: &[MarkdownFile]) -> NoteResult<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM markdown;", [])?;
    {
        let mut insert = tx.prepare(
            "INSERT INTO markdown (filepath, relative, content, metadata) VALUES (?1, ?2, ?3, ?4);",
        )?;
        for file in files {
            insert.execute(params![
                file.filepath,
                file.relative,
                file.content,
                file.metadata
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn note_from_row(row: &Row<'_>) -> NoteResult<Note> {
    let metadata_text: String = row.get("metadata")?;
    let metadata = match serde_json::from_str::<Value>(&metadata_text) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    Ok(Note {
        file: NoteFile {
            filepath: row.get("filepath")?,
            relative: row.get("relative")?,
        },
        content: row.get("content")?,
        metadata,
    })
}

fn json_from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(number) => Value::from(number),
        ValueRef::Real(number) => Number::from_f64(number).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(format!("<{} bytes>", bytes.len())),
    }
}
