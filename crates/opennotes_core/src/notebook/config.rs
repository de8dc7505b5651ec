//! Runtime notebook configuration.

use crate::paths::{path_to_string, relative_to, resolve_from};
use crate::schema::{
    migrate_marker, validate_marker, NotebookGroup, StoredNotebookConfig, ValidationErrors,
    MARKER_FILE_NAME,
};
use log::info;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory created next to the marker for new notebooks.
pub const DEFAULT_NOTES_DIR: &str = ".notes";

/// Validated notebook configuration with `notes_root` resolved.
///
/// Two configs are equal when they live at the same `config_path`.
#[derive(Debug, Clone)]
pub struct NotebookConfig {
    /// Absolute path of the marker file.
    pub config_path: PathBuf,
    pub name: String,
    /// Absolute notes directory; existed when the config was loaded.
    pub notes_root: PathBuf,
    pub contexts: Vec<String>,
    pub templates: BTreeMap<String, String>,
    pub groups: Vec<NotebookGroup>,
}

impl PartialEq for NotebookConfig {
    fn eq(&self, other: &Self) -> bool {
        self.config_path == other.config_path
    }
}

impl Eq for NotebookConfig {}

impl NotebookConfig {
    /// Default config for a notebook rooted at `base` (absolute).
    pub fn new_default(name: &str, base: &Path) -> Self {
        Self {
            config_path: base.join(MARKER_FILE_NAME),
            name: name.to_string(),
            notes_root: base.join(DEFAULT_NOTES_DIR),
            contexts: vec![path_to_string(base)],
            templates: BTreeMap::new(),
            groups: vec![NotebookGroup::catch_all()],
        }
    }

    /// Migrates, validates and resolves a raw marker read from
    /// `config_path`.
    ///
    /// # Errors
    /// - Schema violations, all reported together.
    /// - `root` that cannot be resolved or is not an existing directory,
    ///   reported at path `root`.
    pub fn from_marker(raw: Value, config_path: PathBuf) -> Result<Self, ValidationErrors> {
        let (raw, applied) = migrate_marker(raw);
        if !applied.is_empty() {
            let steps = applied
                .iter()
                .map(|step| step.as_str())
                .collect::<Vec<_>>()
                .join(",");
            info!(
                "event=marker_migrate module=notebook status=ok path={} steps={steps}",
                config_path.display()
            );
        }

        let stored = validate_marker(&raw)?;
        let notebook_dir = config_path.parent().unwrap_or(Path::new("."));
        let notes_root = resolve_from(notebook_dir, &stored.root).map_err(|err| {
            ValidationErrors::single("root", format!("cannot resolve `{}`: {err}", stored.root))
        })?;
        if !notes_root.is_dir() {
            return Err(ValidationErrors::single(
                "root",
                format!("directory does not exist: {}", notes_root.display()),
            ));
        }

        Ok(Self {
            config_path,
            name: stored.name,
            notes_root,
            contexts: stored.contexts,
            templates: stored.templates,
            groups: stored.groups,
        })
    }

    /// Directory holding the marker file.
    pub fn notebook_dir(&self) -> &Path {
        self.config_path.parent().unwrap_or(Path::new("."))
    }

    pub fn has_context(&self, context: &str) -> bool {
        self.contexts.iter().any(|known| known == context)
    }

    /// Returns a copy with `context` appended.
    pub fn with_context(&self, context: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.contexts.push(context.into());
        next
    }

    /// On-disk form; `root` is rewritten relative to the marker directory.
    pub fn to_stored(&self) -> StoredNotebookConfig {
        StoredNotebookConfig {
            name: self.name.clone(),
            root: relative_to(self.notebook_dir(), &self.notes_root),
            contexts: self.contexts.clone(),
            templates: self.templates.clone(),
            groups: self.groups.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NotebookConfig;
    use crate::schema::MARKER_FILE_NAME;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn from_marker_resolves_relative_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("notes")).unwrap();
        let config = NotebookConfig::from_marker(
            json!({"name": "Work", "root": "./notes/../notes"}),
            dir.path().join(MARKER_FILE_NAME),
        )
        .unwrap();

        assert_eq!(config.notes_root, dir.path().join("notes"));
        assert!(config.notes_root.is_absolute());
        assert_eq!(config.to_stored().root, "notes");
    }

    #[test]
    fn from_marker_rejects_missing_root_directory() {
        let dir = TempDir::new().unwrap();
        let errors = NotebookConfig::from_marker(
            json!({"name": "Work", "root": "gone"}),
            dir.path().join(MARKER_FILE_NAME),
        )
        .unwrap_err();
        assert!(errors.has_path("root"));
    }

    #[test]
    fn legacy_marker_defaults_root_to_notebook_dir() {
        let dir = TempDir::new().unwrap();
        let config = NotebookConfig::from_marker(
            json!({
                "name": "Old",
                "groups": [{"name": "All", "globs": ["*.md"], "metadata": {}, "description": "x"}]
            }),
            dir.path().join(MARKER_FILE_NAME),
        )
        .unwrap();

        assert_eq!(config.notes_root, dir.path());
        assert_eq!(config.to_stored().root, ".");
        assert_eq!(config.groups.len(), 1);
    }

    #[test]
    fn with_context_leaves_original_untouched() {
        let dir = TempDir::new().unwrap();
        let original = NotebookConfig::new_default("Work", dir.path());
        let next = original.with_context("/src/app");

        assert_eq!(original.contexts.len(), 1);
        assert_eq!(next.contexts.len(), 2);
        assert!(next.has_context("/src/app"));
        assert_eq!(original, next);
    }
}
