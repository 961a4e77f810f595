// src/application/notes_view.rs
use crate::application::clock::Clock;
use crate::application::debouncer::Debouncer;
use crate::application::note_form::{NoteForm, SubmitError};
use crate::application::note_repository::NoteRepository;
use crate::application::query_client::{
    MutationKind, MutationState, QueryClient, QueryResult, QueryState,
};
use crate::constants::NO_NOTES_NOTICE;
use crate::domain::{Field, FormValues, Note, QueryKey, ValidationErrors};
use tracing::{debug, info};

/// Which surface the user is interacting with. The form lives inside the
/// modal variants, so an open modal always has a mode and a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Browsing,
    Creating(NoteForm),
    Editing { note: Note, form: NoteForm },
}

impl ViewState {
    pub fn is_browsing(&self) -> bool {
        matches!(self, ViewState::Browsing)
    }

    fn form_mut(&mut self) -> Option<&mut NoteForm> {
        match self {
            ViewState::Browsing => None,
            ViewState::Creating(form) | ViewState::Editing { form, .. } => Some(form),
        }
    }
}

/// User intents routed into the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Raw search text, one per keystroke.
    Search(String),
    ChangePage(u32),
    NextPage,
    PrevPage,
    Create,
    Edit(Note),
    Delete(String),
    EditField(Field, String),
    Submit,
    Close,
    /// Re-fetch the current page after a failure.
    Reload,
    /// Time passed; drives the search debouncer.
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalScreen {
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub values: FormValues,
    pub errors: ValidationErrors,
    pub submitting: bool,
    pub submit_error: Option<String>,
}

/// Everything a presenter needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub search: String,
    pub page: u32,
    pub total_pages: u32,
    pub notes: Vec<Note>,
    pub show_pagination: bool,
    pub notice: Option<&'static str>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_mutation: MutationState,
    pub modal: Option<ModalScreen>,
}

pub struct NotesView<R: NoteRepository, C: Clock> {
    client: QueryClient<R, C>,
    debouncer: Debouncer<C>,
    page: u32,
    state: ViewState,
    result: QueryResult,
    needs_fetch: bool,
    last_mutation: MutationState,
}

impl<R: NoteRepository, C: Clock> NotesView<R, C> {
    pub fn new(client: QueryClient<R, C>, debouncer: Debouncer<C>) -> Self {
        let key = client.key(1, debouncer.current());
        let result = client.observe(&key);
        Self {
            client,
            debouncer,
            page: 1,
            state: ViewState::Browsing,
            result,
            needs_fetch: true,
            last_mutation: MutationState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// The effective (debounced) search term.
    pub fn search(&self) -> &str {
        self.debouncer.current()
    }

    pub fn client(&self) -> &QueryClient<R, C> {
        &self.client
    }

    pub fn last_mutation(&self) -> &MutationState {
        &self.last_mutation
    }

    fn key(&self) -> QueryKey {
        self.client.key(self.page, self.debouncer.current())
    }

    /// Result for the current key; pending while a fetch is outstanding.
    pub fn current(&self) -> QueryResult {
        if self.needs_fetch {
            self.client.observe(&self.key())
        } else {
            self.result.clone()
        }
    }

    pub fn dispatch(&mut self, intent: Intent) {
        debug!(?intent, "Dispatching intent");
        match intent {
            Intent::Tick => {
                if let Some(term) = self.debouncer.poll() {
                    self.apply_search(term);
                }
            }
            Intent::Search(text) if self.state.is_browsing() => self.debouncer.input(text),
            Intent::ChangePage(page) if self.state.is_browsing() => self.go_to(page),
            Intent::NextPage if self.state.is_browsing() => self.go_to(self.page + 1),
            Intent::PrevPage if self.state.is_browsing() => self.go_to(self.page.saturating_sub(1)),
            Intent::Create if self.state.is_browsing() => {
                self.state = ViewState::Creating(NoteForm::create());
            }
            Intent::Edit(note) if self.state.is_browsing() => {
                let form = NoteForm::edit(&note);
                self.state = ViewState::Editing { note, form };
            }
            Intent::Delete(id) if self.state.is_browsing() => self.delete(&id),
            Intent::Reload if self.state.is_browsing() => self.needs_fetch = true,
            Intent::EditField(field, value) => {
                if let Some(form) = self.state.form_mut() {
                    form.set_field(field, value);
                }
            }
            Intent::Submit => self.submit(),
            Intent::Close => self.state = ViewState::Browsing,
            ignored => debug!(?ignored, "Intent not applicable in current state"),
        }
    }

    /// Fetch the current key if a key change or invalidation requires it.
    pub fn refresh(&mut self) {
        if !self.needs_fetch {
            return;
        }
        let key = self.key();
        let result = self.client.query(key);
        // Only the result for the key on screen is kept.
        if result.key == self.key() {
            self.result = result;
            self.needs_fetch = false;
        }
    }

    fn apply_search(&mut self, term: String) {
        info!(search = %term, "Search term settled");
        self.page = 1;
        self.needs_fetch = true;
    }

    fn go_to(&mut self, page: u32) {
        let total_pages = self.current().page.total_pages.max(1);
        let page = page.clamp(1, total_pages);
        if page != self.page {
            self.page = page;
            self.needs_fetch = true;
        }
    }

    fn delete(&mut self, id: &str) {
        match self.client.delete_note(id) {
            Ok(()) => {
                self.last_mutation = MutationState::Success(MutationKind::Delete);
                self.needs_fetch = true;
            }
            Err(e) => {
                self.last_mutation = MutationState::Error(MutationKind::Delete, e.to_string());
            }
        }
    }

    fn submit(&mut self) {
        let client = &mut self.client;
        let (kind, outcome) = match &mut self.state {
            ViewState::Browsing => return,
            ViewState::Creating(form) => (
                MutationKind::Create,
                form.submit(|draft| client.create_note(&draft)),
            ),
            ViewState::Editing { note, form } => (
                MutationKind::Update,
                form.submit(|draft| client.update_note(&note.id, &draft)),
            ),
        };

        match outcome {
            Ok(_) => {
                self.last_mutation = MutationState::Success(kind);
                self.state = ViewState::Browsing;
                self.needs_fetch = true;
            }
            Err(SubmitError::Remote(e)) => {
                self.last_mutation = MutationState::Error(kind, e.to_string());
            }
            Err(e) => debug!(error = %e, "Submit blocked"),
        }
    }

    pub fn screen(&self) -> Screen {
        let current = self.current();
        let notice = (current.state == QueryState::Success && current.page.is_empty())
            .then_some(NO_NOTES_NOTICE);
        let error = match &current.state {
            QueryState::Error(message) => Some(message.clone()),
            _ => None,
        };
        let modal = match &self.state {
            ViewState::Browsing => None,
            ViewState::Creating(form) => Some(modal_screen("Create note", "Create note", form)),
            ViewState::Editing { form, .. } => {
                Some(modal_screen("Edit note", "Update note", form))
            }
        };

        Screen {
            search: self.debouncer.current().to_string(),
            page: self.page,
            total_pages: current.page.total_pages,
            show_pagination: current.page.total_pages > 1,
            notice,
            loading: current.state == QueryState::Pending,
            error,
            last_mutation: self.last_mutation.clone(),
            modal,
            notes: current.page.data,
        }
    }
}

fn modal_screen(heading: &'static str, submit_label: &'static str, form: &NoteForm) -> ModalScreen {
    ModalScreen {
        heading,
        submit_label,
        values: form.values().clone(),
        errors: form.errors().clone(),
        submitting: form.is_submitting(),
        submit_error: form.submit_error().map(str::to_string),
    }
}
