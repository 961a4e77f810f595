// src/cli/args.rs
use crate::domain::FormValues;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the notes API, overrides the config file
    #[arg(short = 'u', long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List one page of notes
    List {
        /// Optional search term matched against title and content
        #[arg(value_name = "SEARCH")]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Output the page as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a note
    Create {
        #[command(flatten)]
        fields: NoteFields,
    },

    /// Replace title, content and tag of an existing note
    Update {
        /// Note ID to update
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        #[command(flatten)]
        fields: NoteFields,
    },

    /// Delete a note from the collection
    Delete {
        /// Note ID to delete
        #[arg(value_name = "NOTE_ID")]
        note_id: String,
    },

    /// Browse, search and edit notes interactively
    Browse,
}

#[derive(clap::Args, Debug, Clone)]
pub struct NoteFields {
    /// Note title (3-50 characters)
    #[arg(short, long)]
    pub title: String,

    /// Note body (up to 500 characters)
    #[arg(long, default_value = "")]
    pub content: String,

    /// One of: Todo, Work, Personal, Meeting, Shopping
    #[arg(long, default_value = "Todo")]
    pub tag: String,
}

impl From<NoteFields> for FormValues {
    fn from(fields: NoteFields) -> Self {
        Self {
            title: fields.title,
            content: fields.content,
            tag: fields.tag,
        }
    }
}
