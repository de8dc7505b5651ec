//! YAML frontmatter extraction for markdown notes.

use log::debug;
use serde_json::{Map, Value};

const FENCE: &str = "---";

/// Markdown split into frontmatter metadata and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMarkdown {
    pub metadata: Map<String, Value>,
    pub body: String,
}

/// Splits a leading `---` fenced YAML block from the body.
///
/// Documents without a closed fence, or whose block is not a YAML mapping
/// with string keys, keep the whole text as body and get empty metadata.
pub fn parse_markdown(text: &str) -> ParsedMarkdown {
    let unchanged = || ParsedMarkdown {
        metadata: Map::new(),
        body: text.to_string(),
    };

    let Some((yaml, body)) = split_fenced(text) else {
        return unchanged();
    };

    let parsed = serde_yaml::from_str::<serde_yaml::Value>(yaml)
        .map_err(|err| err.to_string())
        .and_then(|yaml| serde_json::to_value(yaml).map_err(|err| err.to_string()));

    match parsed {
        Ok(Value::Object(metadata)) => ParsedMarkdown {
            metadata,
            body: body.to_string(),
        },
        Ok(Value::Null) => ParsedMarkdown {
            metadata: Map::new(),
            body: body.to_string(),
        },
        Ok(_) => unchanged(),
        Err(err) => {
            debug!("event=frontmatter_parse module=notes status=skipped error={err}");
            unchanged()
        }
    }
}

fn split_fenced(text: &str) -> Option<(&str, &str)> {
    let first_line_end = text.find('\n')?;
    if text[..first_line_end].trim_end() != FENCE {
        return None;
    }

    let rest = &text[first_line_end + 1..];
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::parse_markdown;
    use serde_json::json;

    #[test]
    fn extracts_frontmatter_mapping() {
        let parsed = parse_markdown("---\ntitle: Hello\ntags: [a, b]\n---\n\n# Body\n");
        assert_eq!(parsed.metadata.get("title"), Some(&json!("Hello")));
        assert_eq!(parsed.metadata.get("tags"), Some(&json!(["a", "b"])));
        assert_eq!(parsed.body, "# Body\n");
    }

    #[test]
    fn text_without_fence_is_all_body() {
        let parsed = parse_markdown("# Just a note\n---\n");
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, "# Just a note\n---\n");
    }

    #[test]
    fn unclosed_fence_is_all_body() {
        let parsed = parse_markdown("---\ntitle: x\nno end");
        assert!(parsed.metadata.is_empty());
        assert!(parsed.body.starts_with("---"));
    }

    #[test]
    fn malformed_yaml_keeps_text() {
        let parsed = parse_markdown("---\ntitle: [unterminated\n---\nbody");
        assert!(parsed.metadata.is_empty());
        assert!(parsed.body.contains("body"));
    }

    #[test]
    fn empty_block_yields_empty_metadata() {
        let parsed = parse_markdown("---\n---\nbody");
        assert!(parsed.metadata.is_empty());
        assert_eq!(parsed.body, "body");
    }
}
