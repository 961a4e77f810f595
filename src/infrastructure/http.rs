// src/infrastructure/http.rs
use crate::application::NoteRepository;
use crate::domain::{DomainError, Note, NoteDraft, Page};
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Remote note collection reached over its JSON REST API.
pub struct HttpNoteRepository {
    client: Client,
    base_url: Url,
}

impl HttpNoteRepository {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        debug!(%base_url, ?timeout, "Creating new HttpNoteRepository");
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid base URL: {}", base_url))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("Base URL must start with http:// or https://: {}", base_url);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        info!(%base_url, "Using remote note collection");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, DomainError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DomainError::Network(format!("Base URL cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn notes_url(&self) -> Result<Url, DomainError> {
        self.url(&["notes"])
    }

    fn note_url(&self, id: &str) -> Result<Url, DomainError> {
        self.url(&["notes", id])
    }

    /// Send `request` and return the body of a 2xx response.
    ///
    /// A 404 for a request about `id` becomes `NoteNotFound`.
    fn send(&self, request: RequestBuilder, id: Option<&str>) -> Result<String, DomainError> {
        let response = request
            .send()
            .map_err(|e| DomainError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| DomainError::Network(format!("Failed to read response: {}", e)))?;

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(DomainError::NoteNotFound(id.to_string()));
            }
        }
        if !status.is_success() {
            return Err(DomainError::Network(format!("HTTP {}: {}", status, body.trim())));
        }
        Ok(body)
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, DomainError> {
        serde_json::from_str(body)
            .map_err(|e| DomainError::InvalidResponse(format!("Failed to parse response JSON: {}", e)))
    }
}

impl NoteRepository for HttpNoteRepository {
    #[instrument(level = "debug", skip(self))]
    fn list_notes(&mut self, page: u32, page_size: u32, search: &str) -> Result<Page, DomainError> {
        let mut query = vec![
            ("page", page.to_string()),
            ("perPage", page_size.to_string()),
        ];
        if !search.is_empty() {
            query.push(("search", search.to_string()));
        }

        let body = self.send(self.client.get(self.notes_url()?).query(&query), None)?;
        let page: Page = Self::decode(&body)?;
        debug!(notes = page.data.len(), total_pages = page.total_pages, "Fetched page");
        Ok(page)
    }

    #[instrument(level = "debug", skip(self, draft))]
    fn create_note(&mut self, draft: &NoteDraft) -> Result<Note, DomainError> {
        let body = self.send(self.client.post(self.notes_url()?).json(draft), None)?;
        let note: Note = Self::decode(&body)?;
        info!(note_id = %note.id, "Remote created note");
        Ok(note)
    }

    #[instrument(level = "debug", skip(self, draft))]
    fn update_note(&mut self, id: &str, draft: &NoteDraft) -> Result<Note, DomainError> {
        let body = self.send(self.client.patch(self.note_url(id)?).json(draft), Some(id))?;
        Self::decode(&body)
    }

    #[instrument(level = "debug", skip(self))]
    fn delete_note(&mut self, id: &str) -> Result<(), DomainError> {
        self.send(self.client.delete(self.note_url(id)?), Some(id))?;
        debug!(note_id = id, "Remote deleted note");
        Ok(())
    }
}
