//! Notebook marker schema and validation.
//!
//! # Responsibility
//! - Define the persisted shape of `.opennotes.json`.
//! - Validate raw JSON and report every violated field, not just the first.
//! - Migrate legacy marker shapes to the canonical one before validation.
//!
//! # Invariants
//! - Field paths are dot-joined (`groups.0.globs.1`); the document itself
//!   is reported with an empty path and printed as `(root)`.
//! - Validation never touches the filesystem; root existence is checked
//!   by the notebook layer and reported through the same error type.

pub mod marker;
pub mod migrate;
pub mod names;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use marker::{
    validate_marker, MetadataValue, NotebookGroup, StoredNotebookConfig, MARKER_FILE_NAME,
};
pub use migrate::{migrate_marker, MarkerMigration};
pub use names::{validate_note_name, validate_notebook_name, validate_path};

/// One violated field and the reason it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-joined field path; empty for the document root.
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl Error for ValidationError {}

/// Every violation found while validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![ValidationError::new(path, message)])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns whether any violation was reported for exactly `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.0.iter().any(|err| err.path == path)
    }

    /// Formats violations grouped by field path, in first-seen order.
    ///
    /// ```text
    /// - groups.0.globs
    ///   - expected an array of strings
    /// ```
    pub fn pretty_print(&self) -> String {
        let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
        for err in &self.0 {
            let path = if err.path.is_empty() {
                "(root)"
            } else {
                err.path.as_str()
            };
            match grouped.iter_mut().find(|(seen, _)| *seen == path) {
                Some((_, messages)) => messages.push(err.message.as_str()),
                None => grouped.push((path, vec![err.message.as_str()])),
            }
        }

        let mut lines = Vec::new();
        for (path, messages) in grouped {
            lines.push(format!("- {path}"));
            for message in messages {
                lines.push(format!("  - {message}"));
            }
        }
        lines.join("\n")
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0.as_slice() {
            [] => Ok(()),
            [only] => write!(f, "{only}"),
            all => {
                let lines = all
                    .iter()
                    .map(|err| format!("- {err}"))
                    .collect::<Vec<_>>();
                write!(f, "{}", lines.join("\n"))
            }
        }
    }
}

impl Error for ValidationErrors {}

/// Collects violations while walking a document.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationError::new(path, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consumes the validator, failing when anything was reported.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// Appends `child` to a dot-joined field path.
pub fn join_path(parent: &str, child: impl Display) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}.{child}")
    }
}

#[cfg(test)]
mod tests {
    use super::{join_path, ValidationError, ValidationErrors, Validator};

    #[test]
    fn display_lists_every_error() {
        let errors = ValidationErrors(vec![
            ValidationError::new("user.name", "is required"),
            ValidationError::new("user.email", "must be valid email"),
        ]);
        let text = errors.to_string();
        assert!(text.contains("- user.name: is required"));
        assert!(text.contains("- user.email: must be valid email"));
    }

    #[test]
    fn pretty_print_groups_by_path() {
        let errors = ValidationErrors(vec![
            ValidationError::new("name", "is required"),
            ValidationError::new("", "expected an object"),
            ValidationError::new("name", "must not be blank"),
        ]);
        assert_eq!(
            errors.pretty_print(),
            "- name\n  - is required\n  - must not be blank\n- (root)\n  - expected an object"
        );
    }

    #[test]
    fn validator_collects_nested_paths() {
        let mut validator = Validator::new();
        assert!(!validator.has_errors());

        validator.add_error("", "root error");
        let nested = join_path("groups", 0);
        validator.add_error(&join_path(&nested, "name"), "field error");

        let errors = validator.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.has_path("groups.0.name"));
    }
}
