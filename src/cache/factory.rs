//! Cache construction helpers.
//!
//! ## Example
//!
//! ```rust
//! use mini_cache::cache::{create_cache, EvictionPolicyKind};
//!
//! let cache = create_cache::<u64, String>(100, EvictionPolicyKind::Lru).unwrap();
//! cache.put(1, "hello".to_string()).unwrap();
//! assert_eq!(cache.get(&1), Some("hello".to_string()));
//! ```

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Cache, CacheStore, Clock, EvictionPolicy, EvictionPolicyKind, SystemClock};
use crate::error::Result;

enum PolicySource<K, V> {
    Kind(EvictionPolicyKind),
    Custom(Box<dyn EvictionPolicy<K, V>>),
}

// == Cache Builder ==
/// Configures and builds a [`Cache`] or a bare [`CacheStore`].
pub struct CacheBuilder<K, V> {
    capacity: usize,
    policy: PolicySource<K, V>,
    default_ttl: Option<Duration>,
    clock: Arc<dyn Clock>,
}

impl<K, V> CacheBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + Debug + 'static,
{
    /// Starts a builder for an LRU cache of `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: PolicySource::Kind(EvictionPolicyKind::default()),
            default_ttl: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn policy(mut self, kind: EvictionPolicyKind) -> Self {
        self.policy = PolicySource::Kind(kind);
        self
    }

    /// Uses a caller-supplied policy. It must not track any keys yet.
    pub fn custom_policy(mut self, policy: Box<dyn EvictionPolicy<K, V>>) -> Self {
        self.policy = PolicySource::Custom(policy);
        self
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build_store(self) -> Result<CacheStore<K, V>> {
        let policy = match self.policy {
            PolicySource::Kind(kind) => kind.build(),
            PolicySource::Custom(policy) => policy,
        };
        let store = CacheStore::new(self.capacity, policy)?.with_clock(self.clock);
        match self.default_ttl {
            Some(ttl) => store.with_default_ttl(ttl),
            None => Ok(store),
        }
    }

    pub fn build(self) -> Result<Cache<K, V>> {
        self.build_store().map(Cache::new)
    }
}

// == Factory Functions ==
/// Creates a cache using one of the built-in policies.
pub fn create_cache<K, V>(capacity: usize, kind: EvictionPolicyKind) -> Result<Cache<K, V>>
where
    K: Eq + Hash + Clone + Send + Debug + 'static,
{
    CacheBuilder::new(capacity).policy(kind).build()
}

/// Creates a cache selecting the built-in policy by name (`lru`, `lfu`,
/// `fifo`, `lifo`; case-insensitive).
pub fn create_cache_by_name<K, V>(capacity: usize, policy: &str) -> Result<Cache<K, V>>
where
    K: Eq + Hash + Clone + Send + Debug + 'static,
{
    create_cache(capacity, policy.parse()?)
}

/// Creates a cache driven by a caller-supplied policy.
pub fn create_cache_with_policy<K, V>(
    capacity: usize,
    policy: Box<dyn EvictionPolicy<K, V>>,
) -> Result<Cache<K, V>>
where
    K: Eq + Hash + Clone + Send + Debug + 'static,
{
    CacheBuilder::new(capacity).custom_policy(policy).build()
}
