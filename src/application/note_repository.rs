// src/application/note_repository.rs
use crate::domain::{DomainError, Note, NoteDraft, Page};

/// Remote note collection: persistence and id assignment live behind this trait.
pub trait NoteRepository {
    /// One page of notes whose text matches `search`; an empty search matches all.
    fn list_notes(&mut self, page: u32, page_size: u32, search: &str) -> Result<Page, DomainError>;

    fn create_note(&mut self, draft: &NoteDraft) -> Result<Note, DomainError>;

    fn update_note(&mut self, id: &str, draft: &NoteDraft) -> Result<Note, DomainError>;

    fn delete_note(&mut self, id: &str) -> Result<(), DomainError>;
}
