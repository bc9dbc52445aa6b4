//! FIFO Policy Module
//!
//! Evicts the key that was inserted first. Reads and overwrites never move
//! a key in the queue.

use std::fmt::Debug;
use std::hash::Hash;

use super::order::SequencedKeys;
use super::EvictionPolicy;
use crate::cache::CacheEntry;

// == FIFO Policy ==
/// First-in, first-out eviction over insertion order.
#[derive(Debug)]
pub struct FifoPolicy<K> {
    queue: SequencedKeys<K>,
}

impl<K: Eq + Hash + Clone> FifoPolicy<K> {
    // == Constructor ==
    /// Creates a new empty FIFO tracker.
    pub fn new() -> Self {
        Self {
            queue: SequencedKeys::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Default for FifoPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EvictionPolicy<K, V> for FifoPolicy<K>
where
    K: Eq + Hash + Clone + Send + Debug,
{
    fn name(&self) -> &str {
        "fifo"
    }

    fn record_access(&mut self, _key: &K) {}

    fn record_put(&mut self, key: &K, _entry: &CacheEntry<V>) {
        self.queue.push_if_absent(key);
    }

    fn record_removal(&mut self, key: &K) {
        self.queue.remove(key);
    }

    fn evict(&mut self) -> Option<K> {
        self.queue.oldest().cloned()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.queue.contains(key)
    }
}
