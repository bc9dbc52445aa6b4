//! Cache Module
//!
//! Provides in-memory caching with pluggable eviction and lazy TTL expiration.

mod clock;
mod entry;
mod factory;
mod policy;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, EntryInfo};
pub use factory::{create_cache, create_cache_by_name, create_cache_with_policy, CacheBuilder};
pub use policy::{
    EvictionPolicy, EvictionPolicyKind, FifoPolicy, LfuPolicy, LifoPolicy, LruPolicy,
};
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
