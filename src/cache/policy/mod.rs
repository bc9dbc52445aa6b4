//! Eviction Policy Module
//!
//! Strategy interface deciding which key leaves a full cache, plus the
//! built-in LRU, LFU, FIFO and LIFO implementations.

mod fifo;
mod lfu;
mod lifo;
mod lru;
mod order;

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;
use crate::error::CacheError;

pub use fifo::FifoPolicy;
pub use lfu::LfuPolicy;
pub use lifo::LifoPolicy;
pub use lru::LruPolicy;

// == Eviction Policy Trait ==
/// Bookkeeping for victim selection.
///
/// A policy tracks exactly the keys held by the owning cache and never stores
/// values. The cache calls the `record_*` hooks in the same step as it
/// mutates its entry store, and performs the removal of whatever key
/// [`evict`](EvictionPolicy::evict) selects.
pub trait EvictionPolicy<K, V>: Send + Debug {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// A tracked key was read. No-op for untracked keys.
    fn record_access(&mut self, key: &K);

    /// A key was newly inserted.
    fn record_put(&mut self, key: &K, entry: &CacheEntry<V>);

    /// The value of an already tracked key was overwritten.
    fn record_update(&mut self, _key: &K) {}

    /// A key left the cache for any reason. Must tolerate untracked keys.
    fn record_removal(&mut self, key: &K);

    /// Selects the next victim without forgetting it.
    ///
    /// Returns `None` only when nothing is tracked.
    fn evict(&mut self) -> Option<K>;

    /// Forgets every tracked key.
    fn clear(&mut self);

    /// Number of tracked keys.
    fn len(&self) -> usize;

    /// Whether any key is tracked.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `key` is tracked.
    fn contains(&self, key: &K) -> bool;
}

// == Eviction Policy Kind ==
/// Built-in policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicyKind {
    /// Least recently used
    #[default]
    Lru,
    /// Least frequently used
    Lfu,
    /// First in, first out
    Fifo,
    /// Last in, first out
    Lifo,
}

impl EvictionPolicyKind {
    /// All built-in kinds, in declaration order.
    pub const ALL: [EvictionPolicyKind; 4] = [Self::Lru, Self::Lfu, Self::Fifo, Self::Lifo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lru => "lru",
            Self::Lfu => "lfu",
            Self::Fifo => "fifo",
            Self::Lifo => "lifo",
        }
    }

    /// Builds a fresh, empty policy of this kind.
    pub fn build<K, V>(self) -> Box<dyn EvictionPolicy<K, V>>
    where
        K: Eq + Hash + Clone + Send + Debug + 'static,
    {
        match self {
            Self::Lru => Box::new(LruPolicy::new()),
            Self::Lfu => Box::new(LfuPolicy::new()),
            Self::Fifo => Box::new(FifoPolicy::new()),
            Self::Lifo => Box::new(LifoPolicy::new()),
        }
    }
}

impl fmt::Display for EvictionPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicyKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(Self::Lru),
            "lfu" => Ok(Self::Lfu),
            "fifo" => Ok(Self::Fifo),
            "lifo" => Ok(Self::Lifo),
            _ => Err(CacheError::UnknownPolicy(s.to_string())),
        }
    }
}
