use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::fingerprint::Fingerprint;

/// Memo of derived projections keyed by input fingerprint.
///
/// Values are shared behind `Arc` so views can hold them without cloning the aggregation.
#[derive(Debug)]
pub struct ProjectionCache<V> {
    entries: HashMap<Fingerprint, Arc<V>>,
    hits: u64,
    misses: u64,
}

impl<V> Default for ProjectionCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<V> ProjectionCache<V> {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, key: Fingerprint, compute: impl FnOnce() -> V) -> Arc<V> {
        if let Some(v) = self.entries.get(&key) {
            self.hits += 1;
            tracing::trace!(%key, "projection cache hit");
            return Arc::clone(v);
        }
        self.misses += 1;
        tracing::trace!(%key, "projection cache miss");
        let v = Arc::new(compute());
        self.entries.insert(key, Arc::clone(&v));
        v
    }

    /// Cached value without computing.
    pub fn get(&self, key: &Fingerprint) -> Option<Arc<V>> {
        self.entries.get(key).cloned()
    }

    /// Number of stored projections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to compute.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop every entry; counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/projection.rs"]
mod tests;
