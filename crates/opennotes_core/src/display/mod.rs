//! User-facing text: notices, listings and result tables.
//!
//! # Responsibility
//! - Render `{{key}}` templates and fixed listing layouts to markdown text.
//! - Deliver notices through an injectable sink so core code never writes
//!   to the terminal directly.

pub mod table;
pub mod templates;

use std::io::Write;
use std::sync::Mutex;

pub use table::render_sql_table;
pub use templates::{
    render_note_list, render_notebook_info, render_notebook_list, render_template, NoticeTemplate,
};

/// Receives rendered user notices.
pub trait Notices: Send + Sync {
    fn notice(&self, markdown: &str);
}

/// Writes notices to stdout.
#[derive(Debug, Default)]
pub struct TerminalNotices;

impl Notices for TerminalNotices {
    fn notice(&self, markdown: &str) {
        let mut stdout = std::io::stdout().lock();
        // a closed stdout must not turn a notice into a failure
        let _ = writeln!(stdout, "{}", markdown.trim_end());
        let _ = writeln!(stdout);
    }
}

/// Keeps notices in memory; used by tests and embedders.
#[derive(Debug, Default)]
pub struct RecordedNotices {
    entries: Mutex<Vec<String>>,
}

impl RecordedNotices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notice received so far, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Notices for RecordedNotices {
    fn notice(&self, markdown: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(markdown.to_string());
    }
}
