// src/ports/terminal.rs
use crate::application::{ModalScreen, MutationState, QueryResult, QueryState, Screen};
use crate::constants::NO_NOTES_NOTICE;
use crate::domain::{Field, Note};
use crate::util::text::{first_line, truncate_chars};
use std::fmt::Write;

const EXCERPT_CHARS: usize = 60;

/// Renders view state as plain text for a terminal.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    /// One row per note: `N. [Tag] Title  excerpt`
    pub fn render_rows(&self, notes: &[Note]) -> String {
        let mut out = String::new();
        for (index, note) in notes.iter().enumerate() {
            let _ = write!(out, "{:>3}. [{}] {}", index + 1, note.tag, note.title);
            let excerpt = first_line(&note.content);
            if !excerpt.is_empty() {
                let _ = write!(out, "  {}", truncate_chars(excerpt, EXCERPT_CHARS));
            }
            out.push('\n');
        }
        out
    }

    pub fn render_note(&self, note: &Note) -> String {
        format!(
            "{}\n  id: {}\n  tag: {}\n  updated: {}\n\n{}\n",
            note.title,
            note.id,
            note.tag,
            note.updated_at.format("%Y-%m-%d %H:%M"),
            note.content
        )
    }

    /// Output of a one-shot listing.
    pub fn render_result(&self, result: &QueryResult) -> String {
        let mut out = String::new();
        if let QueryState::Error(message) = &result.state {
            let _ = writeln!(out, "! {}", message);
        }
        if result.page.is_empty() {
            if result.state == QueryState::Success {
                let _ = writeln!(out, "{}", NO_NOTES_NOTICE);
            }
        } else {
            out.push_str(&self.render_rows(&result.page.data));
        }
        if result.page.total_pages > 1 {
            let _ = writeln!(out, "Page {} of {}", result.key.page, result.page.total_pages);
        }
        out
    }

    pub fn render(&self, screen: &Screen) -> String {
        let mut out = String::new();

        let search = if screen.search.is_empty() { "-" } else { &screen.search };
        let _ = write!(out, "Search: {}", search);
        if screen.show_pagination {
            let _ = write!(out, "   Page {} of {}", screen.page, screen.total_pages);
        }
        out.push('\n');

        if screen.loading {
            out.push_str("Loading...\n");
        }
        if let Some(error) = &screen.error {
            let _ = writeln!(out, "! Could not load notes: {}", error);
        }
        match &screen.last_mutation {
            MutationState::Idle => {}
            MutationState::Success(kind) => {
                let _ = writeln!(out, "Note {}d.", kind.verb());
            }
            MutationState::Error(kind, message) => {
                let _ = writeln!(out, "! Failed to {} note: {}", kind.verb(), message);
            }
        }

        if !screen.notes.is_empty() {
            out.push_str(&self.render_rows(&screen.notes));
        }
        if let Some(notice) = screen.notice {
            let _ = writeln!(out, "{}", notice);
        }

        if let Some(modal) = &screen.modal {
            out.push_str(&self.render_modal(modal));
        }
        out
    }

    fn render_modal(&self, modal: &ModalScreen) -> String {
        let mut out = format!("\n== {} ==\n", modal.heading);
        for field in Field::ALL {
            let label = match field {
                Field::Title => "Title",
                Field::Content => "Content",
                Field::Tag => "Tag",
            };
            let _ = writeln!(out, "{:<8} {}", format!("{label}:"), modal.values.get(field));
            if let Some(message) = modal.errors.get(field) {
                let _ = writeln!(out, "         ! {}", message);
            }
        }
        if let Some(error) = &modal.submit_error {
            let _ = writeln!(out, "! {}", error);
        }
        let action = if modal.submitting { "Saving..." } else { modal.submit_label };
        let _ = writeln!(out, "[{}]  [Cancel]", action);
        out
    }
}
