//! Notice templates and listing renderers.

use crate::notebook::Notebook;
use crate::notes::Note;
use crate::paths::path_to_string;
use crate::strings::dedent;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid placeholder regex")
});

/// Fixed notices emitted by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTemplate {
    /// Vars: `name`, `path`.
    NotebookCreated,
    /// Vars: `contextPath`, `notebookPath`.
    ContextAlreadyExists,
    /// Vars: `contextPath`, `notebookPath`.
    ContextAdded,
    /// Vars: `templatePath`, `error`.
    TemplateLoadError,
}

impl NoticeTemplate {
    pub fn source(self) -> &'static str {
        match self {
            Self::NotebookCreated => {
                "
                # Notebook Created

                Your new notebook has been successfully created!

                - **Name**: {{name}}
                - **Path**: {{path}}

                You can start adding notes to your notebook right away.
                "
            }
            Self::ContextAlreadyExists => {
                "
                # Context Already Exists

                The context path is already associated with this notebook.

                - **Context**: {{contextPath}}
                - **Notebook**: {{notebookPath}}

                No changes were made.
                "
            }
            Self::ContextAdded => {
                "
                # Context Added

                The context path has been successfully added to your notebook.

                - **Context**: {{contextPath}}
                - **Notebook**: {{notebookPath}}

                This notebook will now be available when working in that directory.
                "
            }
            Self::TemplateLoadError => {
                "
                # Template Load Error

                Failed to load a template for your notebook. This may cause some features to be unavailable.

                - **Template Path**: {{templatePath}}
                - **Error**: {{error}}

                You may need to check the template file and try again.
                "
            }
        }
    }

    /// Renders the notice with `vars` (a JSON object).
    pub fn render(self, vars: &Value) -> String {
        render_template(dedent(self.source()).trim(), vars)
    }
}

/// Replaces `{{key}}` placeholders with top-level fields of `vars`.
///
/// Strings are inserted verbatim, other values as JSON; missing keys render
/// as empty text.
pub fn render_template(template: &str, vars: &Value) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
        .into_owned()
}

/// Markdown list of notes, titled by [`Note::display_name`], with file links.
pub fn render_note_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No notes found.".to_string();
    }

    let mut out = format!("## Notes ({})\n\n", notes.len());
    for note in notes {
        out.push_str(&format!(
            "- [{}](file://{})\n",
            note.display_name(),
            note.file.filepath
        ));
    }
    out
}

/// Markdown summary of several notebooks.
pub fn render_notebook_list(notebooks: &[Notebook]) -> String {
    if notebooks.is_empty() {
        return "No notebooks found.".to_string();
    }

    let mut out = format!("## Notebooks ({})\n\n", notebooks.len());
    for notebook in notebooks {
        let config = &notebook.config;
        out.push_str(&format!("### {}\n", config.name));
        out.push_str(&format!(
            "- **Path:** {}\n",
            path_to_string(&config.config_path)
        ));
        out.push_str(&format!(
            "- **Root:** {}\n",
            path_to_string(&config.notes_root)
        ));
        if !config.contexts.is_empty() {
            out.push_str(&format!("- **Contexts:** {}\n", config.contexts.join(", ")));
        }
        out.push('\n');
    }
    out
}

/// Markdown detail view of one notebook.
pub fn render_notebook_info(notebook: &Notebook) -> String {
    let config = &notebook.config;
    let mut out = format!("## {}\n\n", config.name);
    out.push_str("| Property | Value |\n|----------|-------|\n");
    out.push_str(&format!(
        "| Config | {} |\n",
        path_to_string(&config.config_path)
    ));
    out.push_str(&format!("| Root | {} |\n", path_to_string(&config.notes_root)));

    if !config.contexts.is_empty() {
        out.push_str("\n### Contexts\n");
        for context in &config.contexts {
            out.push_str(&format!("- {context}\n"));
        }
    }
    if !config.groups.is_empty() {
        out.push_str("\n### Groups\n");
        for group in &config.groups {
            out.push_str(&format!("- **{}** ({})\n", group.name, group.globs.join(", ")));
        }
    }
    out
}
