//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with a pluggable eviction
//! policy and lazy TTL expiration.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, trace};

use crate::cache::{CacheEntry, CacheStats, Clock, EntryInfo, EvictionPolicy, SystemClock};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Single-threaded cache storage with policy-driven eviction and TTL support.
///
/// Every key in `entries` is tracked by `policy` and vice versa. All
/// insertions and removals go through [`attach`](Self::attach) and
/// [`detach`](Self::detach) so the two never drift apart.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Victim selection bookkeeping
    policy: Box<dyn EvictionPolicy<K, V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied when `put` is given none
    default_ttl: Option<chrono::Duration>,
    /// Number of entries carrying an expiration time
    expiring: usize,
    clock: Arc<dyn Clock>,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    // == Constructor ==
    /// Creates a new CacheStore backed by the system clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold, must be positive
    /// * `policy` - Eviction policy, must not track any keys yet
    pub fn new(capacity: usize, policy: Box<dyn EvictionPolicy<K, V>>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "capacity must be positive".to_string(),
            ));
        }
        if !policy.is_empty() {
            return Err(CacheError::InvalidConfiguration(format!(
                "eviction policy '{}' must start empty but tracks {} keys",
                policy.name(),
                policy.len()
            )));
        }

        info!(
            "Cache store initialized: capacity={}, policy={}",
            capacity,
            policy.name()
        );

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            policy,
            stats: CacheStats::new(),
            capacity,
            default_ttl: None,
            expiring: 0,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the TTL used by `put` calls that pass none.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Result<Self> {
        self.default_ttl = Some(to_ttl(ttl)?);
        Ok(self)
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and not expired. Expired entries are
    /// removed and counted as misses.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now();

        if self.expire_if_stale(key, now) {
            self.stats.record_miss();
            return None;
        }

        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };

        entry.record_access(now);
        let value = entry.value.clone();
        self.policy.record_access(key);
        self.stats.record_hit();
        Some(value)
    }

    // == Put ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists, the value and expiration are overwritten in
    /// place. If the cache is at capacity, expired entries are swept and then
    /// the policy picks victims until there is room.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL, must be non-zero (uses the default TTL if None)
    pub fn put(&mut self, key: K, value: V, ttl: Option<Duration>) -> Result<()> {
        let now = self.clock.now();
        let expires_at = self.expiration_for(ttl, now)?;

        // Overwrite case
        if let Some(entry) = self.entries.get_mut(&key) {
            if !entry.is_expired(now) {
                let had_ttl = entry.expires_at.is_some();
                entry.update_value(value, now, expires_at);
                self.adjust_expiring(had_ttl, expires_at.is_some());
                self.policy.record_update(&key);
                return Ok(());
            }
        }
        self.expire_if_stale(&key, now);

        if self.entries.len() >= self.capacity {
            self.make_room(now)?;
        }

        let inserted = key.clone();
        self.attach(key, CacheEntry::new(value, now, expires_at));

        // A policy that lost track of the new key must not leave it readable
        if let Err(err) = self.check_consistency(&inserted) {
            self.detach(&inserted);
            return Err(err);
        }
        Ok(())
    }

    // == Remove ==
    /// Removes an entry by key.
    ///
    /// Returns true only if a live entry was removed. An expired entry is
    /// dropped as well but reported as absent.
    pub fn remove(&mut self, key: &K) -> bool {
        let now = self.clock.now();
        match self.detach(key) {
            Some(entry) if entry.is_expired(now) => {
                trace!(?key, "Removed already expired entry");
                self.stats.record_eviction();
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    // == Contains Key ==
    /// Checks whether a live entry exists without touching statistics or
    /// recency.
    pub fn contains_key(&mut self, key: &K) -> bool {
        let now = self.clock.now();
        if self.expire_if_stale(key, now) {
            return false;
        }
        self.entries.contains_key(key)
    }

    // == Clear ==
    /// Removes every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.policy.clear();
        self.expiring = 0;
        debug!("Cache cleared: dropped {} entries", dropped);
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        self.purge_expired_at(now)
    }

    // == Entry Info ==
    /// Metadata for a live entry. Does not count as an access.
    pub fn entry_info(&self, key: &K) -> Option<EntryInfo> {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.info(now))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len(), self.capacity)
    }

    // == Length ==
    /// Returns the number of live entries.
    ///
    /// Expired entries that have not been swept yet are not counted. While any
    /// entry carries a TTL this scans every entry, so it is O(n) under the
    /// cache lock; call [`purge_expired`](Self::purge_expired) to drop them.
    pub fn len(&self) -> usize {
        if self.expiring == 0 {
            return self.entries.len();
        }
        let now = self.clock.now();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Name of the active eviction policy.
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    // == Internals ==

    fn attach(&mut self, key: K, entry: CacheEntry<V>) {
        if entry.expires_at.is_some() {
            self.expiring += 1;
        }
        self.policy.record_put(&key, &entry);
        self.entries.insert(key, entry);
    }

    fn detach(&mut self, key: &K) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.policy.record_removal(key);
        if entry.expires_at.is_some() {
            self.expiring -= 1;
        }
        Some(entry)
    }

    fn adjust_expiring(&mut self, had_ttl: bool, has_ttl: bool) {
        match (had_ttl, has_ttl) {
            (false, true) => self.expiring += 1,
            (true, false) => self.expiring -= 1,
            _ => {}
        }
    }

    /// Drops `key` if it is present but expired. Returns whether it did.
    fn expire_if_stale(&mut self, key: &K, now: DateTime<Utc>) -> bool {
        let stale = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(now));
        if stale {
            self.detach(key);
            self.stats.record_eviction();
            trace!(?key, "Lazily expired entry");
        }
        stale
    }

    fn purge_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        if self.expiring == 0 {
            return 0;
        }

        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.detach(&key);
            self.stats.record_eviction();
        }

        if count > 0 {
            debug!("TTL sweep: removed {} expired entries", count);
        }
        count
    }

    /// Frees at least one slot, preferring expired entries over live ones.
    fn make_room(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.purge_expired_at(now);

        while self.entries.len() >= self.capacity {
            let Some(victim) = self.policy.evict() else {
                error!(
                    size = self.entries.len(),
                    policy = self.policy.name(),
                    "Eviction policy reported no victim while cache is at capacity"
                );
                return Err(CacheError::InvariantViolation(format!(
                    "policy '{}' reported no victim with {} entries at capacity {}",
                    self.policy.name(),
                    self.entries.len(),
                    self.capacity
                )));
            };

            if self.detach(&victim).is_none() {
                error!(?victim, policy = self.policy.name(), "Eviction victim not in store");
                return Err(CacheError::InvariantViolation(format!(
                    "policy '{}' selected key {:?} which is not in the store",
                    self.policy.name(),
                    victim
                )));
            }
            self.stats.record_eviction();
            debug!(?victim, policy = self.policy.name(), "Evicted entry");
        }
        Ok(())
    }

    /// Verifies `inserted` is tracked and that both sides hold as many keys.
    fn check_consistency(&self, inserted: &K) -> Result<()> {
        if !self.policy.contains(inserted) {
            error!(
                key = ?inserted,
                policy = self.policy.name(),
                "Eviction policy did not track inserted key"
            );
            return Err(CacheError::InvariantViolation(format!(
                "policy '{}' does not track inserted key {:?}",
                self.policy.name(),
                inserted
            )));
        }
        if self.policy.len() != self.entries.len() {
            error!(
                store = self.entries.len(),
                policy = self.policy.len(),
                "Eviction policy out of sync with entry store"
            );
            return Err(CacheError::InvariantViolation(format!(
                "policy '{}' tracks {} keys but the store holds {}",
                self.policy.name(),
                self.policy.len(),
                self.entries.len()
            )));
        }
        Ok(())
    }

    fn expiration_for(
        &self,
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>> {
        let ttl = match ttl {
            Some(ttl) => Some(to_ttl(ttl)?),
            None => self.default_ttl,
        };
        match ttl {
            Some(ttl) => now.checked_add_signed(ttl).map(Some).ok_or_else(|| {
                CacheError::InvalidArgument("TTL overflows the clock range".to_string())
            }),
            None => Ok(None),
        }
    }
}

/// Validates a caller-supplied TTL.
fn to_ttl(ttl: Duration) -> Result<chrono::Duration> {
    if ttl.is_zero() {
        return Err(CacheError::InvalidArgument(
            "TTL must be positive".to_string(),
        ));
    }
    chrono::Duration::from_std(ttl)
        .map_err(|_| CacheError::InvalidArgument(format!("TTL {:?} is out of range", ttl)))
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{EvictionPolicyKind, ManualClock};

    fn store_with(
        capacity: usize,
        kind: EvictionPolicyKind,
    ) -> (CacheStore<String, String>, ManualClock) {
        let clock = ManualClock::default();
        let store = CacheStore::new(capacity, kind.build())
            .unwrap()
            .with_clock(Arc::new(clock.clone()));
        (store, clock)
    }

    fn key(k: &str) -> String {
        k.to_string()
    }

    #[test]
    fn test_store_new() {
        let (store, _) = store_with(100, EvictionPolicyKind::Lru);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.policy_name(), "lru");
    }

    #[test]
    fn test_store_rejects_zero_capacity() {
        let result = CacheStore::<String, String>::new(0, EvictionPolicyKind::Lru.build());
        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with(100, EvictionPolicyKind::Lru);

        store.put(key("key1"), "value1".to_string(), None).unwrap();

        assert_eq!(store.get(&key("key1")), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with(100, EvictionPolicyKind::Lru);

        assert_eq!(store.get(&key("nonexistent")), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_remove() {
        let (mut store, _) = store_with(100, EvictionPolicyKind::Lru);

        store.put(key("key1"), "value1".to_string(), None).unwrap();

        assert!(store.remove(&key("key1")));
        assert!(!store.remove(&key("key1")));
        assert!(store.is_empty());
        assert_eq!(store.get(&key("key1")), None);
    }

    #[test]
    fn test_store_overwrite() {
        let (mut store, _) = store_with(100, EvictionPolicyKind::Lru);

        store.put(key("key1"), "value1".to_string(), None).unwrap();
        store.put(key("key1"), "value2".to_string(), None).unwrap();

        assert_eq!(store.get(&key("key1")), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_rejects_zero_ttl() {
        let (mut store, _) = store_with(100, EvictionPolicyKind::Lru);

        let result = store.put(key("key1"), "value1".to_string(), Some(Duration::ZERO));

        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_with(100, EvictionPolicyKind::Lru);

        store
            .put(key("key1"), "value1".to_string(), Some(Duration::from_millis(10)))
            .unwrap();
        assert!(store.get(&key("key1")).is_some());

        clock.advance_ms(20);

        assert_eq!(store.len(), 0);
        assert_eq!(store.get(&key("key1")), None);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn test_store_default_ttl() {
        let clock = ManualClock::default();
        let mut store = CacheStore::<String, String>::new(10, EvictionPolicyKind::Fifo.build())
            .unwrap()
            .with_clock(Arc::new(clock.clone()))
            .with_default_ttl(Duration::from_secs(1))
            .unwrap();

        store.put(key("short"), "v".to_string(), None).unwrap();
        store
            .put(key("long"), "v".to_string(), Some(Duration::from_secs(60)))
            .unwrap();

        clock.advance_ms(1_500);

        assert!(!store.contains_key(&key("short")));
        assert!(store.contains_key(&key("long")));
    }

    #[test]
    fn test_store_overwrite_clears_ttl() {
        let (mut store, clock) = store_with(10, EvictionPolicyKind::Lru);

        store
            .put(key("k"), "v1".to_string(), Some(Duration::from_millis(10)))
            .unwrap();
        store.put(key("k"), "v2".to_string(), None).unwrap();

        clock.advance_ms(20);

        assert_eq!(store.get(&key("k")), Some("v2".to_string()));
    }

    #[test]
    fn test_store_put_over_expired_key_is_fresh_insert() {
        let (mut store, clock) = store_with(2, EvictionPolicyKind::Fifo);

        store
            .put(key("a"), "1".to_string(), Some(Duration::from_millis(5)))
            .unwrap();
        store.put(key("b"), "2".to_string(), None).unwrap();
        clock.advance_ms(10);

        // a expired, so it re-enters at the back of the queue
        store.put(key("a"), "3".to_string(), None).unwrap();
        store.put(key("c"), "4".to_string(), None).unwrap();

        assert!(!store.contains_key(&key("b")));
        assert!(store.contains_key(&key("a")));
        assert!(store.contains_key(&key("c")));
        assert_eq!(store.stats().evictions, 2);
    }

    #[test]
    fn test_store_lru_eviction() {
        let (mut store, _) = store_with(3, EvictionPolicyKind::Lru);

        store.put(key("key1"), "value1".to_string(), None).unwrap();
        store.put(key("key2"), "value2".to_string(), None).unwrap();
        store.put(key("key3"), "value3".to_string(), None).unwrap();

        // Cache is full, adding key4 should evict key1 (oldest)
        store.put(key("key4"), "value4".to_string(), None).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&key("key1")), None);
        assert!(store.get(&key("key2")).is_some());
        assert!(store.get(&key("key3")).is_some());
        assert!(store.get(&key("key4")).is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let (mut store, _) = store_with(3, EvictionPolicyKind::Lru);

        store.put(key("key1"), "value1".to_string(), None).unwrap();
        store.put(key("key2"), "value2".to_string(), None).unwrap();
        store.put(key("key3"), "value3".to_string(), None).unwrap();

        // Access key1 to make it most recently used
        store.get(&key("key1")).unwrap();

        // Adding key4 should evict key2 (now oldest)
        store.put(key("key4"), "value4".to_string(), None).unwrap();

        assert!(store.contains_key(&key("key1")));
        assert!(!store.contains_key(&key("key2")));
    }

    #[test]
    fn test_store_eviction_prefers_expired_entries() {
        let (mut store, clock) = store_with(2, EvictionPolicyKind::Lifo);

        store.put(key("keep"), "1".to_string(), None).unwrap();
        store
            .put(key("stale"), "2".to_string(), Some(Duration::from_millis(5)))
            .unwrap();
        clock.advance_ms(10);

        store.put(key("new"), "3".to_string(), None).unwrap();

        assert!(store.contains_key(&key("keep")));
        assert!(store.contains_key(&key("new")));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_contains_key_is_silent() {
        let (mut store, _) = store_with(2, EvictionPolicyKind::Lru);

        store.put(key("a"), "1".to_string(), None).unwrap();
        store.put(key("b"), "2".to_string(), None).unwrap();

        assert!(store.contains_key(&key("a")));
        assert!(!store.contains_key(&key("zzz")));

        // a was only checked with contains_key, so it is still the LRU victim
        store.put(key("c"), "3".to_string(), None).unwrap();
        assert!(!store.contains_key(&key("a")));

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_store_remove_expired_returns_false() {
        let (mut store, clock) = store_with(10, EvictionPolicyKind::Lru);

        store
            .put(key("k"), "v".to_string(), Some(Duration::from_millis(1)))
            .unwrap();
        clock.advance_ms(2);

        assert!(!store.remove(&key("k")));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_clear_keeps_counters() {
        let (mut store, _) = store_with(10, EvictionPolicyKind::Lfu);

        store.put(key("a"), "1".to_string(), None).unwrap();
        store.get(&key("a"));
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get(&key("a")), None);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.current_size, 0);
    }

    #[test]
    fn test_store_stats() {
        let (mut store, _) = store_with(100, EvictionPolicyKind::Lru);

        store.put(key("key1"), "value1".to_string(), None).unwrap();
        store.get(&key("key1")).unwrap(); // hit
        let _ = store.get(&key("nonexistent")); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.current_size, 1);
        assert_eq!(stats.capacity, 100);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (mut store, clock) = store_with(100, EvictionPolicyKind::Lru);

        store
            .put(key("key1"), "value1".to_string(), Some(Duration::from_secs(1)))
            .unwrap();
        store
            .put(key("key2"), "value2".to_string(), Some(Duration::from_secs(10)))
            .unwrap();

        clock.advance_ms(1_100);

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&key("key2")).is_some());
    }

    #[test]
    fn test_store_len_skips_unswept_expired_entries() {
        let (mut store, clock) = store_with(10, EvictionPolicyKind::Fifo);

        store.put(key("plain"), "v".to_string(), None).unwrap();
        store
            .put(key("short"), "v".to_string(), Some(Duration::from_millis(5)))
            .unwrap();
        clock.advance_ms(10);

        // Still stored until swept, but not counted
        assert_eq!(store.entries.len(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().current_size, 1);

        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.entries.len(), 1);
        assert_eq!(store.expiring, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_rolls_back_insert_on_policy_drift() {
        let (mut store, _clock) = store_with(4, EvictionPolicyKind::Lru);
        store.put(key("a"), "1".to_string(), None).unwrap();

        // Drop the key from the policy behind the store's back
        store.policy.record_removal(&key("a"));

        let result = store.put(key("b"), "2".to_string(), Some(Duration::from_secs(1)));

        assert!(matches!(result, Err(CacheError::InvariantViolation(_))));
        assert!(!store.entries.contains_key(&key("b")));
        assert_eq!(store.expiring, 0);
        assert!(!store.policy.contains(&key("b")));
    }

    #[test]
    fn test_store_entry_info() {
        let (mut store, clock) = store_with(10, EvictionPolicyKind::Lru);

        store
            .put(key("k"), "v".to_string(), Some(Duration::from_secs(10)))
            .unwrap();
        clock.advance_ms(4_000);
        store.get(&key("k"));
        store.get(&key("k"));

        let info = store.entry_info(&key("k")).unwrap();
        assert_eq!(info.access_count, 2);
        assert_eq!(info.ttl_remaining_ms, Some(6_000));
        assert_eq!(info.last_accessed_at, clock.now());

        // Probing metadata is not an access
        assert_eq!(store.stats().hits, 2);
        assert!(store.entry_info(&key("missing")).is_none());
    }
}
