// src/application/mod.rs
pub mod clock;
pub mod debouncer;
pub mod note_form;
pub mod note_repository;
pub mod notes_view;
pub mod query_cache;
pub mod query_client;

pub use clock::Clock;
pub use debouncer::Debouncer;
pub use note_form::{NoteForm, SubmitError};
pub use note_repository::NoteRepository;
pub use notes_view::{Intent, ModalScreen, NotesView, Screen, ViewState};
pub use query_cache::{CacheLookup, QueryCache};
pub use query_client::{
    MutationKind, MutationState, QueryClient, QueryOptions, QueryResult, QueryState,
};
