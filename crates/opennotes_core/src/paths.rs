//! Path normalization helpers shared by the resolver and the note accessor.
//!
//! # Responsibility
//! - Turn user/config supplied paths into absolute, lexically clean paths.
//! - Compute portable relative paths for persisted marker files.
//! - Enumerate ancestors with a separator-independent stop condition.
//!
//! # Invariants
//! - Normalization is lexical: symlinks are never resolved.
//! - Ancestor enumeration always terminates at the filesystem root.

use path_absolutize::Absolutize;
use std::io;
use std::path::{Path, PathBuf};

/// Returns an absolute, lexically normalized form of `path`.
///
/// Relative inputs resolve against the process working directory.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}

/// Resolves `value` against `base` and normalizes `.`/`..` segments.
///
/// Absolute `value`s are normalized but otherwise kept as-is.
pub fn resolve_from(base: &Path, value: &str) -> io::Result<PathBuf> {
    Ok(Path::new(value).absolutize_from(base)?.into_owned())
}

/// Returns `target` relative to `base_dir`, or `"."` when both are equal.
///
/// Falls back to the absolute `target` when no relative form exists
/// (e.g. different Windows drive prefixes).
pub fn relative_to(base_dir: &Path, target: &Path) -> String {
    match pathdiff::diff_paths(target, base_dir) {
        Some(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Some(relative) => to_portable_string(&relative),
        None => path_to_string(target),
    }
}

/// Lists `start` followed by each of its parents, nearest first.
///
/// The walk stops when a path has no parent, which is the root on every
/// platform, so no separator sentinel is compared.
pub fn ancestors(start: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut current = Some(start);
    while let Some(path) = current {
        if path.as_os_str().is_empty() {
            break;
        }
        out.push(path.to_path_buf());
        current = path.parent();
    }
    out
}

/// Lossy UTF-8 rendering used for persisted and compared path strings.
pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Like [`path_to_string`] but always uses `/` separators.
pub fn to_portable_string(path: &Path) -> String {
    path_to_string(path).replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::{ancestors, relative_to, resolve_from};
    use std::path::{Path, PathBuf};

    #[test]
    fn resolve_from_collapses_dot_segments() {
        let resolved = resolve_from(Path::new("/tmp/nb"), "./notes/../.notes").unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/nb/.notes"));

        let same = resolve_from(Path::new("/tmp/nb"), ".").unwrap();
        assert_eq!(same, PathBuf::from("/tmp/nb"));
    }

    #[test]
    fn resolve_from_keeps_absolute_values() {
        let resolved = resolve_from(Path::new("/tmp/nb"), "/srv/notes").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/notes"));
    }

    #[test]
    fn relative_to_uses_dot_for_identical_paths() {
        assert_eq!(relative_to(Path::new("/tmp/nb"), Path::new("/tmp/nb")), ".");
        assert_eq!(
            relative_to(Path::new("/tmp/nb"), Path::new("/tmp/nb/.notes")),
            ".notes"
        );
        assert_eq!(
            relative_to(Path::new("/tmp/nb"), Path::new("/tmp/shared")),
            "../shared"
        );
    }

    #[test]
    fn ancestors_walk_to_root_and_stop() {
        let walked = ancestors(Path::new("/a/b/c"));
        assert_eq!(
            walked,
            vec![
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b"),
                PathBuf::from("/a"),
                PathBuf::from("/"),
            ]
        );
    }

    #[test]
    fn ancestors_of_root_is_root_only() {
        assert_eq!(ancestors(Path::new("/")), vec![PathBuf::from("/")]);
    }
}
