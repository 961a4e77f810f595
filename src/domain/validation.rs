// src/domain/validation.rs
use crate::constants::{CONTENT_MAX_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS};
use crate::domain::note::{NoteDraft, NoteTag};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Content,
    Tag,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Content, Field::Tag];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Content => "content",
            Field::Tag => "tag",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One message per invalid field.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", summarize(.fields))]
pub struct ValidationErrors {
    fields: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) {
        self.fields.remove(&field);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.fields.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

fn summarize(fields: &BTreeMap<Field, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw form input as typed by the user; nothing here is trusted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default().to_string(),
        }
    }
}

impl From<&NoteDraft> for FormValues {
    fn from(draft: &NoteDraft) -> Self {
        Self {
            title: draft.title.clone(),
            content: draft.content.clone(),
            tag: draft.tag.to_string(),
        }
    }
}

impl FormValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Content => &self.content,
            Field::Tag => &self.tag,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Content => self.content = value,
            Field::Tag => self.tag = value,
        }
    }

    /// Message for a single field, or `None` when it is valid.
    pub fn check(&self, field: Field) -> Option<String> {
        match field {
            Field::Title => check_title(&self.title),
            Field::Content => check_content(&self.content),
            Field::Tag => parse_tag(&self.tag).err(),
        }
    }

    /// All-or-nothing: a draft is produced only when every field passes.
    pub fn validate(&self) -> Result<NoteDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in Field::ALL {
            if let Some(message) = self.check(field) {
                errors.insert(field, message);
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let tag = parse_tag(&self.tag).map_err(|message| {
            let mut errors = ValidationErrors::new();
            errors.insert(Field::Tag, message);
            errors
        })?;

        Ok(NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            tag,
        })
    }
}

fn check_title(title: &str) -> Option<String> {
    let len = title.chars().count();
    if title.is_empty() {
        Some("Title is required".to_string())
    } else if len < TITLE_MIN_CHARS {
        Some(format!("Title must be at least {TITLE_MIN_CHARS} characters"))
    } else if len > TITLE_MAX_CHARS {
        Some(format!("Title must be {TITLE_MAX_CHARS} characters or less"))
    } else {
        None
    }
}

fn check_content(content: &str) -> Option<String> {
    (content.chars().count() > CONTENT_MAX_CHARS)
        .then(|| format!("Content must be {CONTENT_MAX_CHARS} characters or less"))
}

fn parse_tag(tag: &str) -> Result<NoteTag, String> {
    if tag.trim().is_empty() {
        return Err("Tag is required".to_string());
    }
    tag.parse::<NoteTag>().map_err(|_| {
        let allowed = NoteTag::ALL
            .iter()
            .map(NoteTag::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("Tag must be one of: {allowed}")
    })
}
