// src/application/query_cache.rs
use crate::domain::{Page, QueryKey};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
struct CacheEntry {
    page: Page,
    updated_at: Instant,
    last_access: Instant,
    invalidated: bool,
}

impl CacheEntry {
    fn is_stale(&self, now: Instant, stale_time: Duration) -> bool {
        self.invalidated || now.saturating_duration_since(self.updated_at) >= stale_time
    }
}

/// Result of looking a key up without touching the network.
#[derive(Debug, PartialEq)]
pub enum CacheLookup<'a> {
    Fresh(&'a Page),
    /// Usable as a placeholder, but must be re-fetched.
    Stale(&'a Page),
    Missing,
}

/// In-memory listing cache keyed by [`QueryKey`].
///
/// Entries are fresh for `stale_time` after they were stored. Invalidation marks
/// entries stale without dropping them, so they keep serving as placeholders
/// while a re-fetch is pending. Entries not read for `gc_time` are evicted.
#[derive(Debug)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    stale_time: Duration,
    gc_time: Duration,
}

impl QueryCache {
    pub fn new(stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_time,
            gc_time,
        }
    }

    pub fn lookup(&self, key: &QueryKey, now: Instant) -> CacheLookup<'_> {
        match self.entries.get(key) {
            None => CacheLookup::Missing,
            Some(entry) if entry.is_stale(now, self.stale_time) => CacheLookup::Stale(&entry.page),
            Some(entry) => CacheLookup::Fresh(&entry.page),
        }
    }

    pub fn touch(&mut self, key: &QueryKey, now: Instant) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_access = now;
        }
    }

    pub fn store(&mut self, key: QueryKey, page: Page, now: Instant) {
        trace!(%key, notes = page.data.len(), "Caching page");
        self.entries.insert(
            key,
            CacheEntry {
                page,
                updated_at: now,
                last_access: now,
                invalidated: false,
            },
        );
    }

    /// Mark every entry of `namespace` stale. Returns how many were marked.
    pub fn invalidate_namespace(&mut self, namespace: &str) -> usize {
        let mut count = 0;
        for (key, entry) in self.entries.iter_mut() {
            if key.namespace() == namespace {
                entry.invalidated = true;
                count += 1;
            }
        }
        debug!(namespace, invalidated = count, "Invalidated cached pages");
        count
    }

    /// Drop entries that have not been read for `gc_time`.
    pub fn collect_garbage(&mut self, now: Instant) -> usize {
        let gc_time = self.gc_time;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.last_access) < gc_time);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, "Evicted unused cached pages");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> QueryCache {
        QueryCache::new(Duration::from_secs(5), Duration::from_secs(300))
    }

    fn page(total_pages: u32) -> Page {
        Page {
            data: vec![],
            total_pages,
        }
    }

    #[test]
    fn given_entry_younger_than_stale_time_when_looking_up_then_is_fresh() {
        // Arrange
        let mut cache = cache();
        let t0 = Instant::now();
        let key = QueryKey::new(1, 12, "");
        cache.store(key.clone(), page(3), t0);

        // Act
        let lookup = cache.lookup(&key, t0 + Duration::from_millis(4_999));

        // Assert
        assert_eq!(lookup, CacheLookup::Fresh(&page(3)));
    }

    #[test]
    fn given_entry_at_stale_time_when_looking_up_then_is_stale() {
        let mut cache = cache();
        let t0 = Instant::now();
        let key = QueryKey::new(1, 12, "");
        cache.store(key.clone(), page(3), t0);

        let lookup = cache.lookup(&key, t0 + Duration::from_secs(5));

        assert_eq!(lookup, CacheLookup::Stale(&page(3)));
    }

    #[test]
    fn given_unknown_key_when_looking_up_then_is_missing() {
        let cache = cache();
        assert_eq!(
            cache.lookup(&QueryKey::new(1, 12, "x"), Instant::now()),
            CacheLookup::Missing
        );
    }

    #[test]
    fn given_cached_pages_when_invalidating_namespace_then_all_become_stale() {
        // Arrange
        let mut cache = cache();
        let t0 = Instant::now();
        let keys = [
            QueryKey::new(1, 12, ""),
            QueryKey::new(2, 12, ""),
            QueryKey::new(1, 12, "milk"),
        ];
        for key in &keys {
            cache.store(key.clone(), page(2), t0);
        }

        // Act
        let count = cache.invalidate_namespace("notes");

        // Assert
        assert_eq!(count, 3);
        for key in &keys {
            assert!(matches!(cache.lookup(key, t0), CacheLookup::Stale(_)));
        }
    }

    #[test]
    fn given_invalidated_entry_when_stored_again_then_is_fresh() {
        let mut cache = cache();
        let t0 = Instant::now();
        let key = QueryKey::new(1, 12, "");
        cache.store(key.clone(), page(1), t0);
        cache.invalidate_namespace("notes");

        cache.store(key.clone(), page(2), t0);

        assert_eq!(cache.lookup(&key, t0), CacheLookup::Fresh(&page(2)));
    }

    #[test]
    fn given_unused_entry_past_gc_time_when_collecting_then_evicts_only_it() {
        // Arrange
        let mut cache = cache();
        let t0 = Instant::now();
        let old = QueryKey::new(1, 12, "");
        let used = QueryKey::new(2, 12, "");
        cache.store(old.clone(), page(1), t0);
        cache.store(used.clone(), page(1), t0);
        cache.touch(&used, t0 + Duration::from_secs(200));

        // Act
        let evicted = cache.collect_garbage(t0 + Duration::from_secs(300));

        // Assert
        assert_eq!(evicted, 1);
        assert_eq!(cache.lookup(&old, t0), CacheLookup::Missing);
        assert_eq!(cache.len(), 1);
    }
}
