// src/util/testing.rs

use anyhow::Result;
use chrono::Utc;
use std::cell::Cell;
use std::env;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{Clock, NoteRepository};
use crate::domain::{DomainError, Note, NoteDraft, NoteTag, Page};

/// Build a note with the given id, title and tag.
pub fn note(id: &str, title: &str, tag: NoteTag) -> Note {
    let now = Utc::now();
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: String::new(),
        tag,
        created_at: now,
        updated_at: now,
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Set the elapsed time since the clock was created.
    pub fn set(&self, elapsed: Duration) {
        self.offset.set(elapsed);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// In-memory note collection for testing use cases that depend on NoteRepository
///
/// Behaves like the remote collection (paging, search, id assignment) and
/// counts calls per operation so tests can assert on remote traffic.
///
/// # Examples
///
/// ```
/// use notedeck::application::NoteRepository;
/// use notedeck::util::testing::MockNoteRepository;
///
/// let mut mock = MockNoteRepository::builder()
///     .with_generated_notes(13)
///     .build();
///
/// let page = mock.list_notes(2, 12, "").unwrap();
/// assert_eq!(page.data.len(), 1);
/// assert_eq!(page.total_pages, 2);
/// ```
pub struct MockNoteRepository {
    notes: Vec<Note>,
    next_id: usize,
    list_successes_before_failure: Option<(usize, String)>,
    mutation_failure: Option<String>,
    list_calls: usize,
    create_calls: usize,
    update_calls: usize,
    delete_calls: usize,
}

impl MockNoteRepository {
    pub fn builder() -> MockNoteRepositoryBuilder {
        MockNoteRepositoryBuilder::new()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls
    }

    fn check_mutation(&self) -> Result<(), DomainError> {
        match &self.mutation_failure {
            Some(message) => Err(DomainError::Network(message.clone())),
            None => Ok(()),
        }
    }

    fn position(&self, id: &str) -> Result<usize, DomainError> {
        self.notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| DomainError::NoteNotFound(id.to_string()))
    }
}

impl NoteRepository for MockNoteRepository {
    fn list_notes(&mut self, page: u32, page_size: u32, search: &str) -> Result<Page, DomainError> {
        self.list_calls += 1;
        if let Some((successes, message)) = &self.list_successes_before_failure {
            if self.list_calls > *successes {
                return Err(DomainError::Network(message.clone()));
            }
        }

        let needle = search.to_lowercase();
        let matching: Vec<&Note> = self
            .notes
            .iter()
            .filter(|n| {
                needle.is_empty()
                    || n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            })
            .collect();

        let page_size = page_size.max(1) as usize;
        let total_pages = matching.len().div_ceil(page_size).max(1) as u32;
        let data = matching
            .into_iter()
            .skip((page.max(1) as usize - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        Ok(Page { data, total_pages })
    }

    fn create_note(&mut self, draft: &NoteDraft) -> Result<Note, DomainError> {
        self.create_calls += 1;
        self.check_mutation()?;
        self.next_id += 1;
        let mut created = note(&format!("note-{}", self.next_id), &draft.title, draft.tag);
        created.content = draft.content.clone();
        self.notes.push(created.clone());
        Ok(created)
    }

    fn update_note(&mut self, id: &str, draft: &NoteDraft) -> Result<Note, DomainError> {
        self.update_calls += 1;
        self.check_mutation()?;
        let index = self.position(id)?;
        let existing = &mut self.notes[index];
        existing.title = draft.title.clone();
        existing.content = draft.content.clone();
        existing.tag = draft.tag;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    fn delete_note(&mut self, id: &str) -> Result<(), DomainError> {
        self.delete_calls += 1;
        self.check_mutation()?;
        let index = self.position(id)?;
        self.notes.remove(index);
        Ok(())
    }
}

/// Builder for MockNoteRepository
///
/// Provides a fluent interface for configuring mock behavior.
pub struct MockNoteRepositoryBuilder {
    notes: Vec<Note>,
    list_successes_before_failure: Option<(usize, String)>,
    mutation_failure: Option<String>,
}

impl MockNoteRepositoryBuilder {
    pub fn new() -> Self {
        Self {
            notes: vec![],
            list_successes_before_failure: None,
            mutation_failure: None,
        }
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// Add `count` notes titled "Note 1".."Note N" with ids "note-1".."note-N"
    pub fn with_generated_notes(mut self, count: usize) -> Self {
        let start = self.notes.len();
        for i in start + 1..=start + count {
            self.notes
                .push(note(&format!("note-{i}"), &format!("Note {i}"), NoteTag::Todo));
        }
        self
    }

    /// Let the first `successes` list calls succeed, then fail every one after
    pub fn with_list_failure_after(mut self, successes: usize, message: &str) -> Self {
        self.list_successes_before_failure = Some((successes, message.to_string()));
        self
    }

    /// Fail every create, update and delete with a network error
    pub fn with_mutation_failure(mut self, message: &str) -> Self {
        self.mutation_failure = Some(message.to_string());
        self
    }

    pub fn build(self) -> MockNoteRepository {
        let next_id = self.notes.len();
        MockNoteRepository {
            notes: self.notes,
            next_id,
            list_successes_before_failure: self.list_successes_before_failure,
            mutation_failure: self.mutation_failure,
            list_calls: 0,
            create_calls: 0,
            update_calls: 0,
            delete_calls: 0,
        }
    }
}

impl Default for MockNoteRepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "rustls", "tiny_http"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
