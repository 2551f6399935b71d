//! Small TTL cache owned by whoever constructs it.
//!
//! Entries are keyed by string (typically the shop host) and expire after
//! the cache-wide TTL. Eviction of expired entries is handled by `moka`.

use std::time::Duration;

use moka::sync::Cache;

/// Upper bound on cached keys; one entry per shop is expected.
const MAX_ENTRIES: u64 = 1_000;

#[derive(Clone)]
pub struct TtlCache<V: Clone + Send + Sync + 'static> {
    ttl: Duration,
    entries: Cache<String, V>,
}

impl<V: Clone + Send + Sync + 'static> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .time_to_live(ttl)
                .build(),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a clone of the cached value if it has not expired.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.get(key)
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), value);
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.invalidate(key);
    }
}
