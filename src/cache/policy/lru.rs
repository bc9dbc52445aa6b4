//! LRU Policy Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::fmt::Debug;
use std::hash::Hash;

use super::order::SequencedKeys;
use super::EvictionPolicy;
use crate::cache::CacheEntry;

// == LRU Policy ==
/// Tracks access order for LRU eviction strategy.
///
/// Reads, inserts and overwrites all refresh recency. The victim is the key
/// touched longest ago; recency stamps are unique so there are no ties.
#[derive(Debug)]
pub struct LruPolicy<K> {
    /// Order of keys by access time
    order: SequencedKeys<K>,
}

impl<K: Eq + Hash + Clone> LruPolicy<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: SequencedKeys::new(),
        }
    }

    // == Peek Oldest ==
    /// Returns the least recently used key.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.oldest()
    }
}

impl<K: Eq + Hash + Clone> Default for LruPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EvictionPolicy<K, V> for LruPolicy<K>
where
    K: Eq + Hash + Clone + Send + Debug,
{
    fn name(&self) -> &str {
        "lru"
    }

    fn record_access(&mut self, key: &K) {
        if self.order.contains(key) {
            self.order.touch(key);
        }
    }

    fn record_put(&mut self, key: &K, _entry: &CacheEntry<V>) {
        self.order.touch(key);
    }

    fn record_update(&mut self, key: &K) {
        self.order.touch(key);
    }

    fn record_removal(&mut self, key: &K) {
        self.order.remove(key);
    }

    fn evict(&mut self) -> Option<K> {
        self.order.oldest().cloned()
    }

    fn clear(&mut self) {
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.order.contains(key)
    }
}
