use super::{require_notebook, NO_NOTEBOOK_NOTICE};
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use log::warn;
use opennotes_core::display::{render_note_list, render_sql_table};
use opennotes_core::notebook::{self as resolver, NewNote};
use opennotes_core::AppContext;
use std::io::{BufRead, Write};
use std::path::Path;

#[derive(Subcommand)]
pub enum NotesCommand {
    #[command(visible_alias = "ls", about = "List all notes in the notebook")]
    List,

    #[command(about = "Search notes by content or file name")]
    Search(SearchArgs),

    #[command(
        about = "Add a new note to the notebook",
        long_about = "Creates a markdown note in the current notebook. Without a name the file \
                      is named after the slugified title, or the current time."
    )]
    Add(AddArgs),

    #[command(
        visible_alias = "rm",
        about = "Remove a note from the notebook",
        long_about = "Removes a markdown note from the current notebook. Prompts for \
                      confirmation unless --force is used. The .md extension is optional."
    )]
    Remove(RemoveArgs),
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(help = "File name relative to the notes root (.md optional)")]
    pub name: Option<String>,

    #[arg(long, help = "Note title")]
    pub title: Option<String>,

    #[arg(short, long, help = "Template to use")]
    pub template: Option<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    #[arg(help = "Note to remove (.md optional)")]
    pub note: String,

    #[arg(short, long, help = "Skip confirmation prompt")]
    pub force: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(help = "Text to look for in note content and paths")]
    pub query: Option<String>,

    #[arg(long, help = "Run a read-only SQL query against the `markdown` table")]
    pub sql: Option<String>,
}

pub fn run(ctx: &AppContext, explicit: Option<&Path>, cmd: NotesCommand) -> Result<()> {
    let Some(notebook) = require_notebook(ctx, explicit)? else {
        ctx.notices.notice(NO_NOTEBOOK_NOTICE);
        return Ok(());
    };

    match cmd {
        NotesCommand::List => {
            let notes = notebook.notes.search("").unwrap_or_else(|err| {
                warn!("event=notes_list module=cli status=error error={err}");
                Vec::new()
            });
            println!("{}", render_note_list(&notes));
        }
        NotesCommand::Search(SearchArgs { sql: Some(sql), .. }) => {
            let rows = notebook
                .notes
                .execute_sql(&sql)
                .context("SQL query failed")?;
            println!("{}", render_sql_table(&rows));
        }
        NotesCommand::Search(SearchArgs { query: None, .. }) => {
            bail!("query argument required (or use --sql flag)");
        }
        NotesCommand::Search(SearchArgs {
            query: Some(query), ..
        }) => {
            let notes = notebook
                .notes
                .search(&query)
                .context("failed to search notes")?;
            if notes.is_empty() {
                ctx.notices
                    .notice(&format!("No notes found matching '{query}'"));
                return Ok(());
            }
            println!("Found {} note(s) matching '{query}':\n", notes.len());
            println!("{}", render_note_list(&notes));
        }
        NotesCommand::Add(args) => {
            let path = resolver::add_note(
                ctx,
                &notebook,
                NewNote {
                    name: args.name.as_deref(),
                    title: args.title.as_deref(),
                    template: args.template.as_deref(),
                },
            )?;
            println!("Created note: {}", path.display());
        }
        NotesCommand::Remove(args) => {
            let path = resolver::find_note(&notebook, &args.note)?;
            if !args.force && !confirm(&format!("Remove note '{}'?", args.note))? {
                println!("Cancelled.");
                return Ok(());
            }
            resolver::remove_note(&notebook, &args.note)?;
            println!("Removed note: {}", path.display());
        }
    }
    Ok(())
}

/// Asks a yes/no question on stdin; anything but `y`/`yes` is no.
fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N]: ");
    std::io::stdout().flush().context("failed to write prompt")?;

    let mut response = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut response)
        .context("failed to read response")?;
    let response = response.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
