// src/application/query_client.rs
use crate::application::clock::Clock;
use crate::application::note_repository::NoteRepository;
use crate::application::query_cache::{CacheLookup, QueryCache};
use crate::constants::{GC_TIME_MS, NOTES_NAMESPACE, PAGE_SIZE, STALE_TIME_MS};
use crate::domain::{DomainError, Note, NoteDraft, Page, QueryKey};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub page_size: u32,
    pub stale_time: Duration,
    pub gc_time: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            stale_time: Duration::from_millis(STALE_TIME_MS),
            gc_time: Duration::from_millis(GC_TIME_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState {
    /// A fetch is required or in flight.
    Pending,
    Success,
    /// The last fetch failed; the page shown is the last known one.
    Error(String),
}

/// What a caller renders for one query key.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub key: QueryKey,
    pub state: QueryState,
    pub page: Page,
    /// `page` is the empty placeholder, not data from the collection.
    pub is_placeholder: bool,
}

impl QueryResult {
    fn placeholder(key: QueryKey, state: QueryState) -> Self {
        Self {
            key,
            state,
            page: Page::placeholder(),
            is_placeholder: true,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == QueryState::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

/// Outcome of the most recent mutation started from the view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Success(MutationKind),
    Error(MutationKind, String),
}

/// Cached reads and invalidating writes against a [`NoteRepository`].
///
/// Reads go through the [`QueryCache`]; every successful write invalidates
/// the whole notes namespace. Writes never touch cached pages directly, so
/// the view only reflects the remote collection after a re-fetch.
pub struct QueryClient<R: NoteRepository, C: Clock> {
    repository: R,
    cache: QueryCache,
    clock: C,
    options: QueryOptions,
}

impl<R: NoteRepository, C: Clock> QueryClient<R, C> {
    pub fn new(repository: R, clock: C) -> Self {
        Self::with_options(repository, clock, QueryOptions::default())
    }

    pub fn with_options(repository: R, clock: C, options: QueryOptions) -> Self {
        Self {
            repository,
            cache: QueryCache::new(options.stale_time, options.gc_time),
            clock,
            options,
        }
    }

    pub fn key(&self, page: u32, search: &str) -> QueryKey {
        QueryKey::new(page, self.options.page_size, search)
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Cached page for `page`/`search`, fetching when missing or stale.
    pub fn list(&mut self, page: u32, search: &str) -> QueryResult {
        let key = self.key(page, search);
        self.query(key)
    }

    /// Read `key` without fetching: fresh data is a success, anything else
    /// is pending and carries the stale page or the placeholder.
    pub fn observe(&self, key: &QueryKey) -> QueryResult {
        match self.cache.lookup(key, self.clock.now()) {
            CacheLookup::Fresh(page) => QueryResult {
                key: key.clone(),
                state: QueryState::Success,
                page: page.clone(),
                is_placeholder: false,
            },
            CacheLookup::Stale(page) => QueryResult {
                key: key.clone(),
                state: QueryState::Pending,
                page: page.clone(),
                is_placeholder: false,
            },
            CacheLookup::Missing => QueryResult::placeholder(key.clone(), QueryState::Pending),
        }
    }

    #[instrument(level = "debug", skip(self, key), fields(key = %key))]
    pub fn query(&mut self, key: QueryKey) -> QueryResult {
        let now = self.clock.now();
        self.cache.collect_garbage(now);
        self.cache.touch(&key, now);

        let observed = self.observe(&key);
        if observed.is_success() {
            debug!("Serving fresh cached page");
            return observed;
        }

        match self
            .repository
            .list_notes(key.page, key.page_size, &key.search)
        {
            Ok(page) => {
                self.cache.store(key.clone(), page.clone(), self.clock.now());
                QueryResult {
                    key,
                    state: QueryState::Success,
                    page,
                    is_placeholder: false,
                }
            }
            Err(e) => {
                warn!(error = %e, "Fetching notes failed");
                QueryResult {
                    state: QueryState::Error(e.to_string()),
                    ..observed
                }
            }
        }
    }

    /// Mark every cached listing stale.
    pub fn invalidate_notes(&mut self) -> usize {
        self.cache.invalidate_namespace(NOTES_NAMESPACE)
    }

    #[instrument(level = "debug", skip(self, draft), fields(title = %draft.title))]
    pub fn create_note(&mut self, draft: &NoteDraft) -> Result<Note, DomainError> {
        let note = self.repository.create_note(draft)?;
        info!(note_id = %note.id, "Created note");
        self.invalidate_notes();
        Ok(note)
    }

    #[instrument(level = "debug", skip(self, draft))]
    pub fn update_note(&mut self, id: &str, draft: &NoteDraft) -> Result<Note, DomainError> {
        if id.is_empty() {
            return Err(DomainError::MissingId);
        }
        let note = self.repository.update_note(id, draft)?;
        info!(note_id = %note.id, "Updated note");
        self.invalidate_notes();
        Ok(note)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_note(&mut self, id: &str) -> Result<(), DomainError> {
        if id.is_empty() {
            return Err(DomainError::MissingId);
        }
        self.repository.delete_note(id)?;
        info!(note_id = id, "Deleted note");
        self.invalidate_notes();
        Ok(())
    }
}
