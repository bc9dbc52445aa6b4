//! LIFO Policy Module
//!
//! Evicts the most recently inserted key. Like FIFO, reads and overwrites
//! leave insertion order alone.

use std::fmt::Debug;
use std::hash::Hash;

use super::order::SequencedKeys;
use super::EvictionPolicy;
use crate::cache::CacheEntry;

// == LIFO Policy ==
/// Last-in, first-out eviction over insertion order.
#[derive(Debug)]
pub struct LifoPolicy<K> {
    stack: SequencedKeys<K>,
}

impl<K: Eq + Hash + Clone> LifoPolicy<K> {
    // == Constructor ==
    /// Creates a new empty LIFO tracker.
    pub fn new() -> Self {
        Self {
            stack: SequencedKeys::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Default for LifoPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EvictionPolicy<K, V> for LifoPolicy<K>
where
    K: Eq + Hash + Clone + Send + Debug,
{
    fn name(&self) -> &str {
        "lifo"
    }

    fn record_access(&mut self, _key: &K) {}

    fn record_put(&mut self, key: &K, _entry: &CacheEntry<V>) {
        self.stack.push_if_absent(key);
    }

    fn record_removal(&mut self, key: &K) {
        self.stack.remove(key);
    }

    fn evict(&mut self) -> Option<K> {
        self.stack.newest().cloned()
    }

    fn clear(&mut self) {
        self.stack.clear();
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.stack.contains(key)
    }
}
