//! Standalone validators for user-supplied names and paths.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

const NOTEBOOK_NAME_MAX_CHARS: usize = 100;
const NOTE_NAME_MAX_CHARS: usize = 255;

static NOTEBOOK_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s\-_]+$").expect("valid notebook name regex"));
static CONTROL_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x1f]").expect("valid control char regex"));

/// Notebook names: 1..=100 chars of letters, digits, spaces, `-` and `_`.
pub fn validate_notebook_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("name", "notebook name is required"));
    }
    if name.chars().count() > NOTEBOOK_NAME_MAX_CHARS {
        return Err(ValidationError::new(
            "name",
            format!("notebook name must be between 1 and {NOTEBOOK_NAME_MAX_CHARS} characters"),
        ));
    }
    if !NOTEBOOK_NAME_RE.is_match(name) {
        return Err(ValidationError::new(
            "name",
            "notebook name can only contain letters, numbers, spaces, hyphens, and underscores",
        ));
    }
    Ok(())
}

/// Filesystem paths: empty means "use the default"; control chars rejected.
pub fn validate_path(path: &str) -> Result<(), ValidationError> {
    if CONTROL_CHAR_RE.is_match(path) {
        return Err(ValidationError::new("path", "path contains invalid characters"));
    }
    Ok(())
}

/// Note file names, with or without the `.md` suffix.
pub fn validate_note_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("note", "note name is required"));
    }
    let stem = name.strip_suffix(".md").unwrap_or(name);
    if stem.chars().count() > NOTE_NAME_MAX_CHARS {
        return Err(ValidationError::new(
            "note",
            format!("note name is too long (max {NOTE_NAME_MAX_CHARS} characters)"),
        ));
    }
    if stem.contains("..") {
        return Err(ValidationError::new(
            "note",
            "note name cannot contain path traversal (..)",
        ));
    }
    Ok(())
}
