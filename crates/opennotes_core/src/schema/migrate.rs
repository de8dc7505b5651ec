//! Legacy marker migration.
//!
//! Early notebooks were written without `root` (notes lived next to the
//! marker) and carried a per-group `description`. Both shapes are lifted to
//! the canonical schema in memory before validation; nothing is written back
//! until the next explicit save.

use serde_json::Value;

/// Root value implied by markers that predate the `root` field.
pub const LEGACY_IMPLICIT_ROOT: &str = ".";

/// One migration step applied to a raw marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerMigration {
    /// `root` was missing and defaulted to [`LEGACY_IMPLICIT_ROOT`].
    ImplicitRoot,
    /// A group carried the retired `description` field.
    GroupDescription,
}

impl MarkerMigration {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ImplicitRoot => "implicit_root",
            Self::GroupDescription => "group_description",
        }
    }
}

/// Rewrites a raw marker into the canonical shape.
///
/// Non-object documents are returned untouched so the validator can report
/// them. Returns the applied steps, empty for canonical input.
pub fn migrate_marker(mut raw: Value) -> (Value, Vec<MarkerMigration>) {
    let mut applied = Vec::new();
    let Some(object) = raw.as_object_mut() else {
        return (raw, applied);
    };

    if !object.contains_key("root") {
        object.insert(
            "root".to_string(),
            Value::String(LEGACY_IMPLICIT_ROOT.to_string()),
        );
        applied.push(MarkerMigration::ImplicitRoot);
    }

    if let Some(groups) = object.get_mut("groups").and_then(Value::as_array_mut) {
        let mut stripped = false;
        for group in groups.iter_mut().filter_map(Value::as_object_mut) {
            stripped |= group.remove("description").is_some();
        }
        if stripped {
            applied.push(MarkerMigration::GroupDescription);
        }
    }

    (raw, applied)
}
