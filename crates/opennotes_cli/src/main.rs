//! `opennotes` binary entry point.
//!
//! # Responsibility
//! - Parse arguments, start logging and build the shared [`AppContext`].
//! - Dispatch to command handlers; all behavior lives in `opennotes_core`.
//!
//! [`AppContext`]: opennotes_core::AppContext

use anyhow::Result;
use clap::Parser;
use opennotes_core::{init_logging, LoggingConfig};

mod commands;

use commands::{Cli, Commands};

fn main() -> Result<()> {
    let Cli {
        notebook,
        context_match,
        command,
    } = Cli::parse();

    // logging is best effort; the CLI works without a log file
    if let Err(err) = LoggingConfig::from_env().and_then(|config| init_logging(&config)) {
        eprintln!("warning: logging disabled: {err}");
    }

    let ctx = commands::build_context(notebook.as_deref(), context_match)?;
    let explicit = notebook.as_deref();

    match command {
        Commands::Init(args) => commands::init::run(&ctx, args),
        Commands::Notebook(args) => commands::notebook::run(&ctx, explicit, args),
        Commands::Notes(cmd) => commands::notes::run(&ctx, explicit, cmd),
    }
}
