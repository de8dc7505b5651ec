//! Notebook entity and resolution.
//!
//! # Responsibility
//! - Load and validate `.opennotes.json` markers into [`NotebookConfig`].
//! - Discover known notebooks and pick the active one for a directory.
//! - Persist config changes and global registration.
//! - Add and remove note files under the notes root.
//!
//! # Invariants
//! - A notebook is identified by its marker path.
//! - Configs are values: mutation returns a new [`Notebook`].
//! - "Nothing found" is `None`/empty, never an error; only writes fail.

pub mod authoring;
pub mod config;
pub mod context;
pub mod context_match;
pub mod groups;
pub mod resolver;

use crate::config::ConfigError;
use crate::db::Database;
use crate::notes::NoteAccessor;
use crate::schema::{NotebookGroup, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use authoring::{add_note, find_note, remove_note, NewNote};
pub use config::{NotebookConfig, DEFAULT_NOTES_DIR};
pub use context::AppContext;
pub use context_match::ContextMatch;
pub use groups::GroupMatcher;
pub use resolver::{
    add_context, create, has_notebook, infer, list, load, load_config, load_template, open,
    register, save_config,
};

pub type NotebookResult<T> = Result<T, NotebookError>;

#[derive(Debug)]
pub enum NotebookError {
    /// Rejected notebook name.
    InvalidName(ValidationError),
    /// Rejected filesystem path.
    InvalidPath(ValidationError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
    Config(ConfigError),
    /// No marker file in the directory.
    NotFound(PathBuf),
    /// Marker present but the config failed to load.
    InvalidNotebook(PathBuf),
    InvalidNoteName(ValidationError),
    NoteExists(PathBuf),
    NoteNotFound(PathBuf),
}

impl Display for NotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(err) => write!(f, "invalid notebook name: {}", err.message),
            Self::InvalidPath(err) => write!(f, "invalid path: {}", err.message),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Serialize(err) => write!(f, "failed to serialize notebook config: {err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::NotFound(path) => write!(f, "no notebook found at {}", path.display()),
            Self::InvalidNotebook(path) => {
                write!(f, "notebook config at {} is invalid", path.display())
            }
            Self::InvalidNoteName(err) => write!(f, "invalid note name: {}", err.message),
            Self::NoteExists(path) => write!(f, "note already exists: {}", path.display()),
            Self::NoteNotFound(path) => write!(f, "note not found: {}", path.display()),
        }
    }
}

impl Error for NotebookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName(err) | Self::InvalidPath(err) | Self::InvalidNoteName(err) => {
                Some(err)
            }
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidNotebook(_)
            | Self::NoteExists(_)
            | Self::NoteNotFound(_) => None,
        }
    }
}

impl From<ConfigError> for NotebookError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// A loaded notebook and the note accessor bound to its notes root.
#[derive(Debug, Clone)]
pub struct Notebook {
    pub config: NotebookConfig,
    pub notes: NoteAccessor,
    /// One compiled matcher per entry of `config.groups`.
    matchers: Vec<GroupMatcher>,
}

impl PartialEq for Notebook {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
    }
}

impl Notebook {
    pub(crate) fn bind(config: NotebookConfig, db: Arc<Database>) -> Self {
        let notes = NoteAccessor::new(db, config.notes_root.clone());
        let matchers = config.groups.iter().map(GroupMatcher::new).collect();
        Self {
            config,
            notes,
            matchers,
        }
    }

    /// Same notes accessor, new config.
    pub(crate) fn with_config(&self, config: NotebookConfig) -> Self {
        Self::bind(config, self.notes.database())
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Marker file path.
    pub fn path(&self) -> &Path {
        &self.config.config_path
    }

    /// Directory holding the marker.
    pub fn dir(&self) -> &Path {
        self.config.notebook_dir()
    }

    /// First context that matches `cwd` under `mode`.
    pub fn match_context(&self, cwd: &str, mode: ContextMatch) -> Option<&str> {
        self.config
            .contexts
            .iter()
            .map(String::as_str)
            .find(|context| mode.matches(context, cwd))
    }

    /// Every group whose globs match the note path (relative to the notes
    /// root), in config order.
    pub fn groups_for(&self, relative: &str) -> Vec<&NotebookGroup> {
        self.config
            .groups
            .iter()
            .zip(&self.matchers)
            .filter(|(_, matcher)| matcher.is_match(relative))
            .map(|(group, _)| group)
            .collect()
    }
}
