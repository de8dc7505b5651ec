//! Glob membership for notebook groups.
//!
//! A note belongs to every group with at least one matching glob. Globs are
//! matched against the note path relative to the notes root, `/`-separated.
//! `*` and `?` never cross a `/`; `**/` spans zero or more directories.

use crate::schema::NotebookGroup;
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use log::warn;

/// Compiles one group glob with path-aware wildcards.
pub(crate) fn compile_glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

/// Compiled globs of a single group.
#[derive(Debug, Clone)]
pub struct GroupMatcher {
    set: GlobSet,
}

impl GroupMatcher {
    /// Builds the matcher for `group`.
    ///
    /// Globs that fail to compile are logged and skipped; a group left
    /// without globs matches nothing.
    pub fn new(group: &NotebookGroup) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in &group.globs {
            match compile_glob(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => warn!(
                    "event=group_glob module=notebook status=skipped group={} glob={pattern} error={err}",
                    group.name
                ),
            }
        }

        let set = builder.build().unwrap_or_else(|err| {
            warn!(
                "event=group_glob module=notebook status=error group={} error={err}",
                group.name
            );
            GlobSet::empty()
        });
        Self { set }
    }

    pub fn is_match(&self, relative: &str) -> bool {
        self.set.is_match(relative.replace('\\', "/"))
    }
}

#[cfg(test)]
mod tests {
    use super::GroupMatcher;
    use crate::schema::NotebookGroup;
    use std::collections::BTreeMap;

    fn group(globs: &[&str]) -> NotebookGroup {
        NotebookGroup {
            name: "g".to_string(),
            globs: globs.iter().map(|glob| glob.to_string()).collect(),
            metadata: BTreeMap::new(),
            template: None,
        }
    }

    #[test]
    fn double_star_spans_zero_or_more_directories() {
        let all = GroupMatcher::new(&group(&["**/*.md"]));
        assert!(all.is_match("a.md"));
        assert!(all.is_match("x/y/a.md"));
        assert!(!all.is_match("a.txt"));
    }

    #[test]
    fn single_star_stays_in_segment() {
        let daily = GroupMatcher::new(&group(&["daily/*.md"]));
        assert!(daily.is_match("daily/2024-01-01.md"));
        assert!(!daily.is_match("daily/archive/2023.md"));
        assert!(daily.is_match("daily\\2024-01-02.md"));
    }

    #[test]
    fn question_mark_and_literals() {
        let notes = GroupMatcher::new(&group(&["note-?.md"]));
        assert!(notes.is_match("note-1.md"));
        assert!(!notes.is_match("note-12.md"));
        assert!(!notes.is_match("noteX1.md"));
    }

    #[test]
    fn brace_alternatives_match_each_extension() {
        let daily = GroupMatcher::new(&group(&["daily/*.{md,txt}"]));
        assert!(daily.is_match("daily/a.md"));
        assert!(daily.is_match("daily/a.txt"));
        assert!(!daily.is_match("daily/a.org"));
    }

    #[test]
    fn character_classes_are_not_literal_text() {
        let dated = GroupMatcher::new(&group(&["[0-9]*.md"]));
        assert!(dated.is_match("2024.md"));
        assert!(!dated.is_match("[0-9]x.md"));
        assert!(!dated.is_match("notes.md"));
    }

    #[test]
    fn invalid_glob_is_skipped_and_others_still_match() {
        let mixed = GroupMatcher::new(&group(&["[unclosed", "*.md"]));
        assert!(mixed.is_match("a.md"));
        assert!(!mixed.is_match("[unclosed"));
    }
}
