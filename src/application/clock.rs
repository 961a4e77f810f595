// src/application/clock.rs
use std::time::Instant;

/// Source of monotonic time for staleness and debounce decisions.
pub trait Clock {
    fn now(&self) -> Instant;
}
