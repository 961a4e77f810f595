// src/constants.rs
//
// Application-wide constants for the query layer and the view.
// Config values default to these; see `infrastructure/config.rs`.

/// Number of notes requested per page.
///
/// Part of every query key, so changing it never reuses cached pages.
///
/// Used in: `application/query_client.rs`, `infrastructure/config.rs`
pub const PAGE_SIZE: u32 = 12;

/// Age in milliseconds below which a cached page is served without re-fetching.
///
/// Used in: `application/query_cache.rs`
pub const STALE_TIME_MS: u64 = 5_000;

/// Milliseconds an unused cache entry survives before it is evicted.
///
/// Matches the default garbage-collection window of common request-caching
/// libraries (five minutes).
///
/// Used in: `application/query_cache.rs`
pub const GC_TIME_MS: u64 = 300_000;

/// Quiescence window in milliseconds before typed search text takes effect.
///
/// Used in: `application/debouncer.rs`
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Namespace shared by every note listing in the query cache.
///
/// Mutations invalidate the whole namespace.
pub const NOTES_NAMESPACE: &str = "notes";

/// Notice rendered when a successful fetch returns no notes.
pub const NO_NOTES_NOTICE: &str = "No notes found.";

/// Title length bounds, in characters.
pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;

/// Maximum content length, in characters.
pub const CONTENT_MAX_CHARS: usize = 500;

/// Default remote API location when no config or flag provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Interval at which the interactive loop wakes to drive the debouncer.
///
/// Used in: `cli/browse.rs`
pub const BROWSE_TICK_MS: u64 = 50;
