// src/application/debouncer.rs
use crate::application::clock::Clock;
use crate::constants::SEARCH_DEBOUNCE_MS;
use std::time::{Duration, Instant};
use tracing::trace;

/// Turns a stream of raw search text into settled search terms.
///
/// A value becomes effective once no newer input arrived for `window`.
/// Every input restarts the window. A settled value equal to the current
/// effective term is swallowed.
pub struct Debouncer<C: Clock> {
    clock: C,
    window: Duration,
    pending: Option<(String, Instant)>,
    current: String,
}

impl<C: Clock> Debouncer<C> {
    pub fn new(clock: C) -> Self {
        Self::with_window(clock, Duration::from_millis(SEARCH_DEBOUNCE_MS))
    }

    pub fn with_window(clock: C, window: Duration) -> Self {
        Self {
            clock,
            window,
            pending: None,
            current: String::new(),
        }
    }

    pub fn input(&mut self, value: impl Into<String>) {
        let value = value.into();
        trace!(value, "Search input");
        self.pending = Some((value, self.clock.now()));
    }

    /// Emit the pending value once the window has elapsed since the last input.
    pub fn poll(&mut self) -> Option<String> {
        let (_, at) = self.pending.as_ref()?;
        if self.clock.now().saturating_duration_since(*at) < self.window {
            return None;
        }
        self.settle()
    }

    /// Emit the pending value now, ignoring the window.
    pub fn flush(&mut self) -> Option<String> {
        self.settle()
    }

    fn settle(&mut self) -> Option<String> {
        let (value, _) = self.pending.take()?;
        if value == self.current {
            return None;
        }
        self.current = value.clone();
        Some(value)
    }

    /// The last emitted search term.
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
