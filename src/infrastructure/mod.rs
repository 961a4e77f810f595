// src/infrastructure/mod.rs
pub mod clock;
pub mod config;
pub mod http;

pub use clock::SystemClock;
pub use config::Config;
pub use http::HttpNoteRepository;
