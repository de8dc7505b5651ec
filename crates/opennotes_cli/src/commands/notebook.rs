use super::{current_dir, require_notebook, NO_NOTEBOOK_NOTICE};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use opennotes_core::display::{render_notebook_info, render_notebook_list};
use opennotes_core::notebook as resolver;
use opennotes_core::AppContext;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct NotebookArgs {
    #[command(subcommand)]
    pub command: Option<NotebookCommand>,
}

#[derive(Subcommand)]
pub enum NotebookCommand {
    #[command(about = "Create a new notebook")]
    Create(CreateArgs),

    #[command(about = "Register an existing notebook globally")]
    Register(RegisterArgs),

    #[command(about = "List registered notebooks and notebooks in ancestor directories")]
    List,

    #[command(about = "Add a context path to the current notebook")]
    AddContext(AddContextArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(help = "Notebook directory (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    #[arg(short, long, help = "Notebook name")]
    pub name: String,

    #[arg(short, long, visible_alias = "global", help = "Register this notebook globally")]
    pub register: bool,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(help = "Notebook directory (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    #[arg(long, alias = "addContext", help = "Also add the current directory as a context")]
    pub add_context: bool,
}

#[derive(Args)]
pub struct AddContextArgs {
    #[arg(help = "Context directory (defaults to the current directory)")]
    pub path: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, explicit: Option<&Path>, args: NotebookArgs) -> Result<()> {
    match args.command {
        None => info(ctx, explicit),
        Some(NotebookCommand::Create(args)) => create(ctx, args),
        Some(NotebookCommand::Register(args)) => register(ctx, args),
        Some(NotebookCommand::List) => list(ctx),
        Some(NotebookCommand::AddContext(args)) => add_context(ctx, explicit, args),
    }
}

fn info(ctx: &AppContext, explicit: Option<&Path>) -> Result<()> {
    match require_notebook(ctx, explicit)? {
        Some(notebook) => println!("{}", render_notebook_info(&notebook)),
        None => ctx.notices.notice(NO_NOTEBOOK_NOTICE),
    }
    Ok(())
}

fn create(ctx: &AppContext, args: CreateArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => current_dir()?,
    };
    let notebook = resolver::create(ctx, &args.name, &path, args.register)
        .context("failed to create notebook")?;

    println!("  Config: {}", notebook.path().display());
    println!("  Notes:  {}", notebook.config.notes_root.display());
    if args.register {
        println!("  Registered globally");
    }
    Ok(())
}

fn register(ctx: &AppContext, args: RegisterArgs) -> Result<()> {
    let cwd = current_dir()?;
    let path = args.path.unwrap_or_else(|| cwd.clone());
    let context = args.add_context.then_some(cwd.as_path());

    let notebook =
        resolver::register(ctx, &path, context).context("failed to register notebook")?;
    println!(
        "Registered notebook '{}' at {}",
        notebook.name(),
        notebook.dir().display()
    );
    Ok(())
}

fn list(ctx: &AppContext) -> Result<()> {
    let notebooks = resolver::list(ctx, &current_dir()?);
    if notebooks.is_empty() {
        ctx.notices.notice(NO_NOTEBOOK_NOTICE);
        return Ok(());
    }
    println!("{}", render_notebook_list(&notebooks));
    Ok(())
}

fn add_context(ctx: &AppContext, explicit: Option<&Path>, args: AddContextArgs) -> Result<()> {
    let Some(notebook) = require_notebook(ctx, explicit)? else {
        ctx.notices.notice(NO_NOTEBOOK_NOTICE);
        return Ok(());
    };
    let path = match args.path {
        Some(path) => path,
        None => current_dir()?,
    };
    resolver::add_context(ctx, &notebook, &path).context("failed to add context")?;
    Ok(())
}
