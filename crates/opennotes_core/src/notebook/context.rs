use super::ContextMatch;
use crate::config::ConfigService;
use crate::db::Database;
use crate::display::{NoticeTemplate, Notices};
use serde_json::Value;
use std::sync::Arc;

/// Process-wide collaborators passed to every resolver operation.
///
/// Built once at startup by the caller; nothing here is global.
pub struct AppContext {
    pub config: ConfigService,
    pub db: Arc<Database>,
    pub notices: Arc<dyn Notices>,
    pub context_match: ContextMatch,
}

impl AppContext {
    /// Context with a fresh (lazily opened) database and prefix matching.
    pub fn new(config: ConfigService, notices: Arc<dyn Notices>) -> Self {
        Self {
            config,
            db: Arc::new(Database::new()),
            notices,
            context_match: ContextMatch::default(),
        }
    }

    pub fn with_database(mut self, db: Arc<Database>) -> Self {
        self.db = db;
        self
    }

    pub fn with_context_match(mut self, context_match: ContextMatch) -> Self {
        self.context_match = context_match;
        self
    }

    /// Renders `template` with `vars` and hands it to the notice sink.
    pub fn notify(&self, template: NoticeTemplate, vars: &Value) {
        self.notices.notice(&template.render(vars));
    }
}
