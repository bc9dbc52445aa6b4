//! LFU Policy Module
//!
//! Evicts the key with the fewest recorded reads, breaking ties by
//! insertion order (oldest first).

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use super::EvictionPolicy;
use crate::cache::CacheEntry;

/// `(frequency, insertion sequence)`; orders victims first.
type Rank = (u64, u64);

// == LFU Policy ==
/// Least-frequently-used eviction.
///
/// Only reads raise a key's frequency. Overwrites keep it and a removed key
/// starts again from zero when reinserted.
#[derive(Debug)]
pub struct LfuPolicy<K> {
    /// Current rank of every tracked key
    ranks: HashMap<K, Rank>,
    /// Keys ordered by rank
    by_rank: BTreeMap<Rank, K>,
    next_seq: u64,
}

impl<K: Eq + Hash + Clone> LfuPolicy<K> {
    // == Constructor ==
    /// Creates a new empty LFU tracker.
    pub fn new() -> Self {
        Self {
            ranks: HashMap::new(),
            by_rank: BTreeMap::new(),
            next_seq: 0,
        }
    }

    // == Frequency ==
    /// Number of reads recorded for `key` since it was inserted.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.ranks.get(key).map(|&(freq, _)| freq)
    }
}

impl<K: Eq + Hash + Clone> Default for LfuPolicy<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> EvictionPolicy<K, V> for LfuPolicy<K>
where
    K: Eq + Hash + Clone + Send + Debug,
{
    fn name(&self) -> &str {
        "lfu"
    }

    fn record_access(&mut self, key: &K) {
        if let Some(rank) = self.ranks.get_mut(key) {
            if let Some(k) = self.by_rank.remove(&*rank) {
                rank.0 += 1;
                self.by_rank.insert(*rank, k);
            }
        }
    }

    fn record_put(&mut self, key: &K, _entry: &CacheEntry<V>) {
        if self.ranks.contains_key(key) {
            return;
        }
        let rank = (0, self.next_seq);
        self.next_seq += 1;
        self.ranks.insert(key.clone(), rank);
        self.by_rank.insert(rank, key.clone());
    }

    fn record_removal(&mut self, key: &K) {
        if let Some(rank) = self.ranks.remove(key) {
            self.by_rank.remove(&rank);
        }
    }

    fn evict(&mut self) -> Option<K> {
        self.by_rank.first_key_value().map(|(_, key)| key.clone())
    }

    fn clear(&mut self) {
        self.ranks.clear();
        self.by_rank.clear();
    }

    fn len(&self) -> usize {
        self.ranks.len()
    }

    fn contains(&self, key: &K) -> bool {
        self.ranks.contains_key(key)
    }
}
