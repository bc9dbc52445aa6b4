//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// A miss is not an error: lookups return `Option::None` for absent keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Cache construction was rejected (e.g. zero capacity)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An argument to a cache operation was rejected (e.g. zero TTL)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Policy name does not match any built-in eviction policy
    #[error("Unknown eviction policy: {0}")]
    UnknownPolicy(String),

    /// The eviction policy and the entry store disagree
    #[error("Internal invariant violation: {0}")]
    InvariantViolation(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
