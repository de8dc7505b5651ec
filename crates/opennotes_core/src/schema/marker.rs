//! Persisted `.opennotes.json` shape and its collecting validator.

use super::{join_path, ValidationErrors, Validator};
use crate::notebook::groups::compile_glob;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Fixed, case-sensitive marker filename inside a notebook directory.
pub const MARKER_FILE_NAME: &str = ".opennotes.json";

/// Scalar metadata value attached to a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(Number),
    Text(String),
}

/// Named, glob-driven classification of notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookGroup {
    pub name: String,
    pub globs: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, MetadataValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl NotebookGroup {
    /// Catch-all group written into newly created notebooks.
    pub fn catch_all() -> Self {
        Self {
            name: "Default".to_string(),
            globs: vec!["**/*.md".to_string()],
            metadata: BTreeMap::new(),
            template: None,
        }
    }
}

/// Marker file contents exactly as stored on disk.
///
/// `root` stays relative to the marker's directory here; resolution happens
/// when the notebook layer builds a runtime config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNotebookConfig {
    pub name: String,
    pub root: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<NotebookGroup>,
}

/// Validates a raw (already migrated) marker document.
///
/// Unknown top-level keys are ignored. All violations are reported together.
pub fn validate_marker(raw: &Value) -> Result<StoredNotebookConfig, ValidationErrors> {
    let mut validator = Validator::new();

    let Some(object) = raw.as_object() else {
        return Err(ValidationErrors::single("", "expected an object"));
    };

    match object.get("name") {
        Some(Value::String(name)) if name.trim().is_empty() => {
            validator.add_error("name", "must not be blank");
        }
        Some(Value::String(_)) => {}
        Some(_) => validator.add_error("name", "expected a string"),
        None => validator.add_error("name", "is required"),
    }

    match object.get("root") {
        Some(Value::String(_)) => {}
        Some(_) => validator.add_error("root", "expected a string"),
        None => validator.add_error("root", "is required"),
    }

    if let Some(contexts) = present(object, "contexts") {
        check_contexts(&mut validator, contexts);
    }
    if let Some(templates) = present(object, "templates") {
        check_string_map(&mut validator, "templates", templates);
    }
    if let Some(groups) = present(object, "groups") {
        check_groups(&mut validator, groups);
    }

    validator.finish()?;

    serde_json::from_value(raw.clone())
        .map_err(|err| ValidationErrors::single("", format!("unreadable marker: {err}")))
}

fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

fn check_contexts(validator: &mut Validator, value: &Value) {
    let Some(items) = value.as_array() else {
        validator.add_error("contexts", "expected an array of strings");
        return;
    };
    for (index, item) in items.iter().enumerate() {
        let path = join_path("contexts", index);
        match item.as_str() {
            Some(context) if Path::new(context).is_absolute() => {}
            Some(context) => {
                validator.add_error(&path, format!("must be an absolute path (was `{context}`)"));
            }
            None => validator.add_error(&path, "expected a string"),
        }
    }
}

fn check_string_map(validator: &mut Validator, path: &str, value: &Value) {
    let Some(entries) = value.as_object() else {
        validator.add_error(path, "expected an object of strings");
        return;
    };
    for (key, entry) in entries {
        if !entry.is_string() {
            validator.add_error(&join_path(path, key), "expected a string");
        }
    }
}

fn check_groups(validator: &mut Validator, value: &Value) {
    let Some(groups) = value.as_array() else {
        validator.add_error("groups", "expected an array");
        return;
    };

    for (index, group) in groups.iter().enumerate() {
        let group_path = join_path("groups", index);
        let Some(group) = group.as_object() else {
            validator.add_error(&group_path, "expected an object");
            continue;
        };

        if !group.get("name").is_some_and(Value::is_string) {
            validator.add_error(&join_path(&group_path, "name"), "expected a string");
        }

        let globs_path = join_path(&group_path, "globs");
        match group.get("globs").and_then(Value::as_array) {
            Some(globs) => {
                for (glob_index, glob) in globs.iter().enumerate() {
                    let glob_path = join_path(&globs_path, glob_index);
                    match glob.as_str() {
                        Some(pattern) => {
                            if let Err(err) = compile_glob(pattern) {
                                validator.add_error(&glob_path, format!("invalid glob: {}", err.kind()));
                            }
                        }
                        None => validator.add_error(&glob_path, "expected a string"),
                    }
                }
            }
            None => validator.add_error(&globs_path, "expected an array of strings"),
        }

        let metadata_path = join_path(&group_path, "metadata");
        match group.get("metadata").and_then(Value::as_object) {
            Some(metadata) => {
                for (key, entry) in metadata {
                    if !(entry.is_string() || entry.is_number() || entry.is_boolean()) {
                        validator.add_error(
                            &join_path(&metadata_path, key),
                            "expected a string, number or boolean",
                        );
                    }
                }
            }
            None => validator.add_error(&metadata_path, "expected an object"),
        }

        if let Some(template) = present(group, "template") {
            if !template.is_string() {
                validator.add_error(&join_path(&group_path, "template"), "expected a string");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_marker, MetadataValue};
    use serde_json::json;

    #[test]
    fn accepts_minimal_marker() {
        let stored = validate_marker(&json!({"name": "Work", "root": "."})).unwrap();
        assert_eq!(stored.name, "Work");
        assert_eq!(stored.root, ".");
        assert!(stored.contexts.is_empty());
        assert!(stored.groups.is_empty());
    }

    #[test]
    fn accepts_full_marker_with_scalar_metadata() {
        let stored = validate_marker(&json!({
            "name": "Work",
            "root": ".notes",
            "contexts": ["/home/me/work"],
            "templates": {"daily": "templates/daily.md"},
            "groups": [{
                "name": "Journal",
                "globs": ["journal/**/*.md"],
                "metadata": {"kind": "journal", "priority": 2, "pinned": true},
                "template": "daily"
            }],
            "extra": "ignored"
        }))
        .unwrap();

        let group = &stored.groups[0];
        assert_eq!(group.template.as_deref(), Some("daily"));
        assert_eq!(
            group.metadata.get("pinned"),
            Some(&MetadataValue::Bool(true))
        );
        assert_eq!(
            group.metadata.get("kind"),
            Some(&MetadataValue::Text("journal".to_string()))
        );
    }

    #[test]
    fn reports_every_violation_with_paths() {
        let errors = validate_marker(&json!({
            "root": 3,
            "contexts": ["relative/path", 7],
            "templates": {"daily": false},
            "groups": [
                {"name": "ok", "globs": ["*.md", 1], "metadata": {"nested": {"a": 1}}},
                "not a group"
            ]
        }))
        .unwrap_err();

        for path in [
            "name",
            "root",
            "contexts.0",
            "contexts.1",
            "templates.daily",
            "groups.0.globs.1",
            "groups.0.metadata.nested",
            "groups.1",
        ] {
            assert!(errors.has_path(path), "missing violation for `{path}`");
        }
        assert_eq!(errors.len(), 8);
    }

    #[test]
    fn rejects_unparseable_glob() {
        let errors = validate_marker(&json!({
            "name": "Work",
            "root": ".",
            "groups": [{"name": "Broken", "globs": ["*.md", "[unclosed"], "metadata": {}}]
        }))
        .unwrap_err();
        assert!(errors.has_path("groups.0.globs.1"));
        assert!(!errors.has_path("groups.0.globs.0"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn rejects_non_object_document() {
        let errors = validate_marker(&json!(["not", "an", "object"])).unwrap_err();
        assert!(errors.has_path(""));
    }

    #[test]
    fn group_requires_globs_and_metadata() {
        let errors = validate_marker(&json!({
            "name": "Work",
            "root": ".",
            "groups": [{"name": "Default"}]
        }))
        .unwrap_err();
        assert!(errors.has_path("groups.0.globs"));
        assert!(errors.has_path("groups.0.metadata"));
    }
}
