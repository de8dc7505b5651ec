pub mod init;
pub mod notebook;
pub mod notes;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use opennotes_core::notebook as resolver;
use opennotes_core::paths::path_to_string;
use opennotes_core::{AppContext, ConfigService, ContextMatch, Notebook, TerminalNotices};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const NO_NOTEBOOK_NOTICE: &str = "No notebook found.

Create one with:
  opennotes notebook create --name \"My Notebook\"";

#[derive(Parser)]
#[command(
    name = "opennotes",
    version,
    about = "A CLI for managing markdown-based notes",
    long_about = "OpenNotes manages markdown notes organized in notebooks.\n\nThe active \
                  notebook is picked from --notebook, OPENNOTES_NOTEBOOK_PATH, the global \
                  config, or the contexts of known notebooks.\n\nEnvironment: \
                  OPENNOTES_CONFIG, OPENNOTES_LOG_DIR, LOG_LEVEL, DEBUG"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to the notebook directory to use")]
    pub notebook: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "OPENNOTES_CONTEXT_MATCH",
        default_value_t = ContextMatch::Prefix,
        help = "How contexts match the working directory (prefix|segment)"
    )]
    pub context_match: ContextMatch,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Initialize opennotes configuration")]
    Init(init::InitArgs),

    #[command(visible_alias = "nb", about = "Manage notebooks")]
    Notebook(notebook::NotebookArgs),

    #[command(subcommand, about = "List, search, add and remove notes")]
    Notes(notes::NotesCommand),
}

/// Loads the global config and applies the `--notebook` override.
pub fn build_context(notebook: Option<&Path>, context_match: ContextMatch) -> Result<AppContext> {
    let config = ConfigService::load_default()
        .context("failed to load global config")?
        .with_notebook_path_override(notebook.map(path_to_string));
    Ok(AppContext::new(config, Arc::new(TerminalNotices)).with_context_match(context_match))
}

pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("failed to read working directory")
}

/// Opens the explicit notebook, or infers one from the working directory.
///
/// An explicit path that is not a valid notebook is an error; nothing
/// inferred is `None`.
pub fn require_notebook(ctx: &AppContext, explicit: Option<&Path>) -> Result<Option<Notebook>> {
    if let Some(path) = explicit {
        return match resolver::open(ctx, path) {
            Some(notebook) => Ok(Some(notebook)),
            None => bail!("no valid notebook at {}", path.display()),
        };
    }
    Ok(resolver::infer(ctx, &current_dir()?))
}
