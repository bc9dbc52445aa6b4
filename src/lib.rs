//! Mini Cache - A lightweight in-memory cache library
//!
//! Provides a capacity-bounded cache with pluggable eviction (LRU, LFU, FIFO,
//! LIFO or a custom policy) and lazy TTL expiration.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{create_cache, create_cache_with_policy, Cache, CacheBuilder, CacheStats};
pub use config::Config;
pub use error::{CacheError, Result};
