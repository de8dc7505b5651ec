//! Small text helpers for note names, templates and frontmatter.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

/// Removes the common leading indentation of all non-blank lines.
pub use textwrap::dedent;

static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid slug filter regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Lowercases `text`, drops everything but `[a-z0-9]`, whitespace and `-`,
/// then joins words with `-`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase().replace('\n', " ");
    let filtered = NON_SLUG_RE.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RE.replace_all(&filtered, "-");
    hyphenated.trim_matches('-').to_string()
}

/// Renders a flat map as YAML-style frontmatter lines (without fences).
///
/// Arrays render as `- item` lists; strings are emitted bare.
pub fn object_to_frontmatter(object: &Map<String, Value>) -> String {
    let mut lines = Vec::new();
    for (key, value) in object {
        match value {
            Value::Array(items) => {
                lines.push(format!("{key}:"));
                for item in items {
                    lines.push(format!("  - {}", scalar_text(item)));
                }
            }
            other => lines.push(format!("{key}: {}", scalar_text(other))),
        }
    }
    lines.join("\n")
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
