// src/cli/browse.rs
use crate::application::{Clock, Intent, NoteRepository, NotesView, Screen};
use crate::constants::BROWSE_TICK_MS;
use crate::domain::Field;
use crate::ports::TerminalPresenter;
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

pub const HELP: &str = "\
Commands:
  /TEXT          search (typing; takes effect after a pause)
  page N | next | prev
  new            open the create form
  edit N         edit row N
  delete N       delete row N
  title T | content C | tag T   edit the open form
  submit | cancel
  reload         retry loading the current page
  help | quit
";

#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    Intent(Intent),
    Help,
    Quit,
}

/// Parse one input line. Row numbers refer to the rows on `screen`.
pub fn parse_line(line: &str, screen: &Screen) -> Result<BrowseCommand, String> {
    if let Some(text) = line.strip_prefix('/') {
        return Ok(BrowseCommand::Intent(Intent::Search(text.to_string())));
    }

    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let intent = match word {
        "quit" | "q" | "exit" => return Ok(BrowseCommand::Quit),
        "help" | "?" => return Ok(BrowseCommand::Help),
        "page" => Intent::ChangePage(parse_number(rest)?),
        "next" | "n" => Intent::NextPage,
        "prev" | "p" => Intent::PrevPage,
        "new" | "create" => Intent::Create,
        "edit" => Intent::Edit(row(screen, rest)?.clone()),
        "delete" | "rm" => Intent::Delete(row(screen, rest)?.id.clone()),
        "title" => Intent::EditField(Field::Title, rest.to_string()),
        "content" => Intent::EditField(Field::Content, rest.to_string()),
        "tag" => Intent::EditField(Field::Tag, rest.to_string()),
        "submit" | "save" => Intent::Submit,
        "cancel" | "close" => Intent::Close,
        "reload" => Intent::Reload,
        "" => return Err("empty command".to_string()),
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(BrowseCommand::Intent(intent))
}

fn parse_number(text: &str) -> Result<u32, String> {
    text.parse::<u32>()
        .map_err(|_| format!("expected a number, got '{}'", text))
}

fn row<'a>(screen: &'a Screen, text: &str) -> Result<&'a crate::domain::Note, String> {
    let index = parse_number(text)?;
    index
        .checked_sub(1)
        .and_then(|i| screen.notes.get(i as usize))
        .ok_or_else(|| format!("no row {} on this page", index))
}

/// Drive `view` from `lines` until quit or end of input.
///
/// Lines are read on a helper thread; all view state stays on this thread,
/// which wakes every tick so the search debouncer can settle.
pub fn run_browse<R, C, I, W>(
    view: &mut NotesView<R, C>,
    presenter: &TerminalPresenter,
    lines: I,
    out: &mut W,
) -> Result<()>
where
    R: NoteRepository,
    C: Clock,
    I: Iterator<Item = io::Result<String>> + Send + 'static,
    W: Write,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in lines {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "Stopped reading input");
                    break;
                }
            }
        }
    });

    view.refresh();
    let mut shown = view.screen();
    write!(out, "{}", presenter.render(&shown)).context("Failed to write output")?;

    let tick = Duration::from_millis(BROWSE_TICK_MS);
    loop {
        let intent = match rx.recv_timeout(tick) {
            Ok(line) => match parse_line(&line, &shown) {
                Ok(BrowseCommand::Intent(intent)) => intent,
                Ok(BrowseCommand::Help) => {
                    write!(out, "{}", HELP).context("Failed to write output")?;
                    continue;
                }
                Ok(BrowseCommand::Quit) => break,
                Err(message) => {
                    writeln!(out, "? {}", message).context("Failed to write output")?;
                    continue;
                }
            },
            Err(RecvTimeoutError::Timeout) => Intent::Tick,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        view.dispatch(intent);
        let screen = view.screen();
        if screen != shown && screen.loading {
            // Placeholder frame while the fetch runs
            write!(out, "{}", presenter.render(&screen)).context("Failed to write output")?;
        }
        view.refresh();

        let screen = view.screen();
        if screen != shown {
            write!(out, "{}", presenter.render(&screen)).context("Failed to write output")?;
            shown = screen;
        }
        out.flush().context("Failed to flush output")?;
    }

    info!("Leaving browse mode");
    Ok(())
}
