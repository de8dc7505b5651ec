//! Creating and removing note files inside a notebook's notes root.
//!
//! # Invariants
//! - Note names are relative to the notes root and always end in `.md`.
//! - `add_note` never overwrites an existing file.
//! - Template text wins over generated frontmatter; a template that cannot
//!   be loaded falls back to generated content.

use super::{load_template, AppContext, Notebook, NotebookError, NotebookResult};
use crate::display::render_template;
use crate::paths::to_portable_string;
use crate::schema::{validate_note_name, MetadataValue, ValidationError};
use crate::strings::{object_to_frontmatter, slugify};
use chrono::{DateTime, Local, SecondsFormat};
use log::{debug, info};
use serde_json::{json, Map, Value};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const NOTE_SUFFIX: &str = ".md";

/// Input for [`add_note`]. Every field is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewNote<'a> {
    /// File name relative to the notes root, `.md` optional.
    pub name: Option<&'a str>,
    pub title: Option<&'a str>,
    /// Template key from the notebook config. Defaults to the first
    /// matching group's template.
    pub template: Option<&'a str>,
}

/// Creates a note file and returns its absolute path.
///
/// Without a name the file is named after the slugified title, or the
/// current local time (`YYYY-MM-DD-HHMMSS.md`).
///
/// # Errors
/// - [`NotebookError::InvalidNoteName`] for a rejected name.
/// - [`NotebookError::NoteExists`] when the file is already there.
/// - I/O failures creating directories or writing the file.
pub fn add_note(ctx: &AppContext, notebook: &Notebook, note: NewNote<'_>) -> NotebookResult<PathBuf> {
    let now = Local::now();
    let title = note.title.map(str::trim).filter(|title| !title.is_empty());
    let file_name = match note.name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name.to_string(),
        None => match title.map(slugify).filter(|slug| !slug.is_empty()) {
            Some(slug) => slug,
            None => now.format("%Y-%m-%d-%H%M%S").to_string(),
        },
    };

    let path = resolve_note(notebook, &file_name)?;
    let relative = path
        .strip_prefix(&notebook.config.notes_root)
        .map(to_portable_string)
        .unwrap_or_else(|_| file_name.clone());
    let content = note_content(ctx, notebook, &relative, title, note.template, now);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| NotebookError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|source| match source.kind() {
            ErrorKind::AlreadyExists => NotebookError::NoteExists(path.clone()),
            _ => NotebookError::Io {
                path: path.clone(),
                source,
            },
        })?;
    file.write_all(content.as_bytes())
        .map_err(|source| NotebookError::Io {
            path: path.clone(),
            source,
        })?;

    info!(
        "event=note_add module=notebook status=ok notebook={} note={relative}",
        notebook.dir().display()
    );
    Ok(path)
}

/// Absolute path of an existing note.
///
/// # Errors
/// - [`NotebookError::InvalidNoteName`] for a rejected name.
/// - [`NotebookError::NoteNotFound`] when no such file exists.
pub fn find_note(notebook: &Notebook, name: &str) -> NotebookResult<PathBuf> {
    let path = resolve_note(notebook, name.trim())?;
    if !path.is_file() {
        return Err(NotebookError::NoteNotFound(path));
    }
    Ok(path)
}

/// Deletes a note file and returns the removed path.
pub fn remove_note(notebook: &Notebook, name: &str) -> NotebookResult<PathBuf> {
    let path = find_note(notebook, name)?;
    std::fs::remove_file(&path).map_err(|source| NotebookError::Io {
        path: path.clone(),
        source,
    })?;
    info!(
        "event=note_remove module=notebook status=ok path={}",
        path.display()
    );
    Ok(path)
}

fn resolve_note(notebook: &Notebook, name: &str) -> NotebookResult<PathBuf> {
    let file_name = if name.ends_with(NOTE_SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{NOTE_SUFFIX}")
    };
    validate_note_name(&file_name).map_err(NotebookError::InvalidNoteName)?;
    if Path::new(&file_name).is_absolute() {
        return Err(NotebookError::InvalidNoteName(ValidationError::new(
            "note",
            "note name must be relative to the notes root",
        )));
    }
    Ok(notebook.config.notes_root.join(file_name))
}

fn note_content(
    ctx: &AppContext,
    notebook: &Notebook,
    relative: &str,
    title: Option<&str>,
    template: Option<&str>,
    now: DateTime<Local>,
) -> String {
    let groups = notebook.groups_for(relative);
    let template = template.or_else(|| groups.iter().find_map(|group| group.template.as_deref()));
    let created = now.to_rfc3339_opts(SecondsFormat::Secs, false);

    if let Some(name) = template {
        if let Some(text) = load_template(ctx, notebook, name) {
            debug!("event=note_add module=notebook status=template template={name}");
            return render_template(
                &text,
                &json!({
                    "title": title.unwrap_or_default(),
                    "created": created,
                    "date": now.format("%Y-%m-%d").to_string(),
                }),
            );
        }
        debug!("event=note_add module=notebook status=fallback reason=template_unavailable template={name}");
    }

    let mut metadata = Map::new();
    for group in &groups {
        for (key, value) in &group.metadata {
            metadata.insert(key.clone(), metadata_json(value));
        }
    }
    if let Some(title) = title {
        metadata.insert("title".to_string(), Value::from(title));
    }
    metadata.insert("created".to_string(), Value::from(created));

    let mut content = format!("---\n{}\n---\n\n", object_to_frontmatter(&metadata));
    if let Some(title) = title {
        content.push_str(&format!("# {title}\n\n"));
    }
    content
}

fn metadata_json(value: &MetadataValue) -> Value {
    match value {
        MetadataValue::Bool(flag) => Value::Bool(*flag),
        MetadataValue::Number(number) => Value::Number(number.clone()),
        MetadataValue::Text(text) => Value::String(text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_note, NOTE_SUFFIX};
    use crate::db::Database;
    use crate::notebook::{Notebook, NotebookConfig, NotebookError};
    use std::path::Path;
    use std::sync::Arc;

    fn notebook() -> Notebook {
        let config = NotebookConfig::new_default("Work", Path::new("/tmp/nb"));
        Notebook::bind(config, Arc::new(Database::new()))
    }

    #[test]
    fn suffix_is_optional() {
        let nb = notebook();
        let expected = Path::new("/tmp/nb/.notes/daily/today.md");
        assert_eq!(resolve_note(&nb, "daily/today").unwrap(), expected);
        assert_eq!(resolve_note(&nb, "daily/today.md").unwrap(), expected);
        assert!(expected.to_string_lossy().ends_with(NOTE_SUFFIX));
    }

    #[test]
    fn rejects_traversal_and_absolute_names() {
        let nb = notebook();
        assert!(matches!(
            resolve_note(&nb, "../escape"),
            Err(NotebookError::InvalidNoteName(_))
        ));
        assert!(matches!(
            resolve_note(&nb, "/etc/passwd"),
            Err(NotebookError::InvalidNoteName(_))
        ));
    }
}
