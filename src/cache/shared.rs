//! Thread-safe cache handle.
//!
//! Wraps a [`CacheStore`] in a single mutex so the entry store, the policy
//! and the statistics are always observed together.

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore, EntryInfo};
use crate::error::Result;

// == Cache ==
/// Capacity-bounded cache safe to share between threads (e.g. behind an `Arc`).
///
/// Every operation takes the lock, runs to completion and releases it.
#[derive(Debug)]
pub struct Cache<K, V> {
    store: Mutex<CacheStore<K, V>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new(store: CacheStore<K, V>) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Returns a clone of the value, or None on a miss.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.store.lock().get(key)
    }

    /// Stores a value, using the cache's default TTL if one is configured.
    pub fn put(&self, key: K, value: V) -> Result<()> {
        self.store.lock().put(key, value, None)
    }

    /// Stores a value that expires after `ttl`.
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        self.store.lock().put(key, value, Some(ttl))
    }

    pub fn remove(&self, key: &K) -> bool {
        self.store.lock().remove(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.store.lock().contains_key(key)
    }

    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// Removes all expired entries, returning how many were dropped.
    pub fn purge_expired(&self) -> usize {
        self.store.lock().purge_expired()
    }

    pub fn entry_info(&self, key: &K) -> Option<EntryInfo> {
        self.store.lock().entry_info(key)
    }

    /// Number of live entries.
    ///
    /// O(n) while any entry carries a TTL, see [`CacheStore::len`].
    pub fn size(&self) -> usize {
        self.store.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn policy_name(&self) -> String {
        self.store.lock().policy_name().to_string()
    }

    /// Takes the store back out of the handle.
    pub fn into_inner(self) -> CacheStore<K, V> {
        self.store.into_inner()
    }
}

impl<K, V> From<CacheStore<K, V>> for Cache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn from(store: CacheStore<K, V>) -> Self {
        Self::new(store)
    }
}
