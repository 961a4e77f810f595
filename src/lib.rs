// src/lib.rs
pub mod application;
pub mod cli;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::{Context, Result};
use application::{Debouncer, NoteForm, NotesView, QueryClient, QueryState, SubmitError};
use infrastructure::{Config, HttpNoteRepository, SystemClock};
use ports::TerminalPresenter;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};
use crate::cli::args::{Args, Command};

pub fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting notedeck with arguments");

    // Initialize configuration
    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        debug!(%base_url, "Overriding base URL from command line");
        config.api.base_url = base_url;
    }

    // Initialize infrastructure
    let repository = HttpNoteRepository::new(&config.api.base_url, config.api.timeout())
        .context("Failed to set up the notes API client")?;

    // Initialize application
    let clock = SystemClock;
    let mut client = QueryClient::with_options(repository, clock, config.query.options());
    let presenter = TerminalPresenter::new();
    let mut stdout = io::stdout().lock();

    match args.command {
        Command::List { search, page, json } => {
            let search = search.unwrap_or_default();
            info!(page, %search, "Listing notes");
            let result = client.list(page, &search);
            if json {
                if let QueryState::Error(message) = &result.state {
                    anyhow::bail!("Failed to list notes: {}", message);
                }
                writeln!(stdout, "{}", serde_json::to_string_pretty(&result.page)?)?;
            } else {
                write!(stdout, "{}", presenter.render_result(&result))?;
            }
        }
        Command::Create { fields } => {
            let mut form = NoteForm::with_values(fields.into());
            let note = form
                .submit(|draft| client.create_note(&draft))
                .map_err(submit_failure)?;
            write!(stdout, "{}", presenter.render_note(&note))?;
        }
        Command::Update { note_id, fields } => {
            let mut form = NoteForm::with_values(fields.into());
            let note = form
                .submit(|draft| client.update_note(&note_id, &draft))
                .map_err(submit_failure)?;
            write!(stdout, "{}", presenter.render_note(&note))?;
        }
        Command::Delete { note_id } => {
            client
                .delete_note(&note_id)
                .with_context(|| format!("Failed to delete note {}", note_id))?;
            writeln!(stdout, "Deleted note {}", note_id)?;
        }
        Command::Browse => {
            let debouncer = Debouncer::with_window(clock, config.query.debounce());
            let mut view = NotesView::new(client, debouncer);
            let lines = io::BufReader::new(io::stdin()).lines();
            writeln!(stdout, "Type 'help' for commands.")?;
            cli::browse::run_browse(&mut view, &presenter, lines, &mut stdout)?;
        }
    }

    Ok(())
}

fn submit_failure(error: SubmitError) -> anyhow::Error {
    match error {
        SubmitError::Invalid(errors) => {
            let lines: Vec<String> = errors
                .iter()
                .map(|(field, message)| format!("  {}: {}", field, message))
                .collect();
            anyhow::anyhow!("Note is invalid:\n{}", lines.join("\n"))
        }
        other => anyhow::Error::new(other).context("Failed to save note"),
    }
}
