use anyhow::{Context, Result};
use clap::Args;
use opennotes_core::AppContext;

#[derive(Args)]
pub struct InitArgs {}

/// Writes the current (possibly default) global config to disk.
pub fn run(ctx: &AppContext, _args: InitArgs) -> Result<()> {
    ctx.config
        .write(&ctx.config.store())
        .context("failed to initialize")?;
    println!("OpenNotes initialized at {}", ctx.config.path().display());
    Ok(())
}
