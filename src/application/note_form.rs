// src/application/note_form.rs
use crate::domain::{DomainError, Field, FormValues, Note, NoteDraft, ValidationErrors};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Invalid note: {0}")]
    Invalid(ValidationErrors),
    #[error("A submission is already in progress")]
    AlreadySubmitting,
    #[error(transparent)]
    Remote(DomainError),
}

/// Editable note form with per-field validation and a submit guard.
///
/// A field is only checked once the user edits it; a submit attempt
/// checks all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteForm {
    values: FormValues,
    errors: ValidationErrors,
    submitting: bool,
    submit_error: Option<String>,
}

impl NoteForm {
    /// Blank form for a new note.
    pub fn create() -> Self {
        Self::with_values(FormValues::default())
    }

    /// Form pre-filled from an existing note.
    pub fn edit(note: &Note) -> Self {
        Self::with_values(FormValues::from(&note.draft()))
    }

    pub fn with_values(values: FormValues) -> Self {
        Self {
            values,
            errors: ValidationErrors::new(),
            submitting: false,
            submit_error: None,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Error reported by the remote collection for the last submit.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Update one field and re-validate it.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.values.set(field, value);
        self.revalidate(field);
    }

    fn revalidate(&mut self, field: Field) {
        match self.values.check(field) {
            Some(message) => self.errors.insert(field, message),
            None => self.errors.remove(field),
        }
    }

    /// Validate everything and mark the form as in flight.
    ///
    /// Fails without side effects when a submission is already running;
    /// fails and leaves the form idle when any field is invalid.
    pub fn begin_submit(&mut self) -> Result<NoteDraft, SubmitError> {
        if self.submitting {
            debug!("Ignoring submit while another is in flight");
            return Err(SubmitError::AlreadySubmitting);
        }
        match self.values.validate() {
            Ok(draft) => {
                self.errors = ValidationErrors::new();
                self.submit_error = None;
                self.submitting = true;
                Ok(draft)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    pub fn finish_submit<T>(&mut self, outcome: &Result<T, DomainError>) {
        self.submitting = false;
        self.submit_error = outcome.as_ref().err().map(ToString::to_string);
    }

    /// Validate, run `send` with the draft, and record its outcome.
    pub fn submit<T, F>(&mut self, send: F) -> Result<T, SubmitError>
    where
        F: FnOnce(NoteDraft) -> Result<T, DomainError>,
    {
        let draft = self.begin_submit()?;
        let outcome = send(draft);
        self.finish_submit(&outcome);
        outcome.map_err(SubmitError::Remote)
    }
}
