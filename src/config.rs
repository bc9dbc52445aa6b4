//! Configuration Module
//!
//! Handles loading cache and demo workload configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::EvictionPolicyKind;
use crate::error::Result;

/// Cache and demo workload configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Eviction policy used when the cache is full
    pub policy: EvictionPolicyKind,
    /// Default TTL for entries without explicit TTL, None = never expire
    pub default_ttl: Option<Duration>,
    /// Number of demo worker threads
    pub workers: usize,
    /// Operations performed by each demo worker
    pub operations: usize,
    /// Number of distinct keys the demo workload draws from
    pub key_space: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_POLICY` - One of lru, lfu, fifo, lifo (default: lru)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds, 0 = none (default: 0)
    /// - `DEMO_WORKERS` - Worker threads (default: 4)
    /// - `DEMO_OPERATIONS` - Operations per worker (default: 10000)
    /// - `DEMO_KEY_SPACE` - Distinct keys (default: 2000)
    ///
    /// Unparseable numbers fall back to their defaults; an unknown policy
    /// name is an error.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let policy = match env::var("CACHE_POLICY") {
            Ok(name) => name.parse()?,
            Err(_) => defaults.policy,
        };

        let default_ttl = match parse_var::<u64>("CACHE_DEFAULT_TTL_MS") {
            Some(0) | None => None,
            Some(ms) => Some(Duration::from_millis(ms)),
        };

        Ok(Self {
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            policy,
            default_ttl,
            workers: parse_var("DEMO_WORKERS").unwrap_or(defaults.workers),
            operations: parse_var("DEMO_OPERATIONS").unwrap_or(defaults.operations),
            key_space: parse_var("DEMO_KEY_SPACE").unwrap_or(defaults.key_space),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            policy: EvictionPolicyKind::Lru,
            default_ttl: None,
            workers: 4,
            operations: 10_000,
            key_space: 2_000,
        }
    }
}
