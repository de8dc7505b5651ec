//! Core logic for OpenNotes: notebook resolution, configuration and note
//! access. The CLI crate only parses arguments and renders results.

pub mod config;
pub mod db;
pub mod display;
pub mod logging;
pub mod notebook;
pub mod notes;
pub mod paths;
pub mod schema;
pub mod strings;

pub use config::{ConfigError, ConfigResult, ConfigService, GlobalConfig};
pub use db::{Database, DbError, DbResult};
pub use display::{Notices, RecordedNotices, TerminalNotices};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use notebook::{
    AppContext, ContextMatch, Notebook, NotebookConfig, NotebookError, NotebookResult,
};
pub use notes::{Note, NoteAccessor, NoteError, NoteFile, NoteResult, SqlRow};
pub use schema::{NotebookGroup, ValidationError, ValidationErrors, MARKER_FILE_NAME};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
