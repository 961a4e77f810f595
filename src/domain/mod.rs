// src/domain/mod.rs
pub mod error;
pub mod note;
pub mod query_key;
pub mod validation;

pub use error::DomainError;
pub use note::{Note, NoteDraft, NoteTag, Page};
pub use query_key::QueryKey;
pub use validation::{Field, FormValues, ValidationErrors};
