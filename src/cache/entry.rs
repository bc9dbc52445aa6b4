//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was created or last overwritten
    pub created_at: DateTime<Utc>,
    /// When the entry was last read or written
    pub last_accessed_at: DateTime<Utc>,
    /// Number of successful reads
    pub access_count: u64,
    /// Absolute expiration time, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with an optional absolute expiration time.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `now` - Creation time
    /// * `expires_at` - Optional expiration instant
    pub fn new(value: V, now: DateTime<Utc>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value,
            created_at: now,
            last_accessed_at: now,
            access_count: 0,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: An entry is considered expired when `now` is greater
    /// than or equal to the expiration time, so an entry is gone as soon as its
    /// TTL has fully elapsed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Record Access ==
    /// Marks the entry as read at `now`.
    pub fn record_access(&mut self, now: DateTime<Utc>) {
        self.last_accessed_at = now;
        self.access_count += 1;
    }

    // == Update Value ==
    /// Replaces the value in place.
    ///
    /// Creation and access times are reset; the access count is kept.
    pub fn update_value(
        &mut self,
        value: V,
        now: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) {
        self.value = value;
        self.created_at = now;
        self.last_accessed_at = now;
        self.expires_at = expires_at;
    }

    // == Time To Live ==
    /// Returns remaining TTL as of `now`, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::zero())` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at.map(|expires| {
            if expires > now {
                expires - now
            } else {
                Duration::zero()
            }
        })
    }

    // == Info ==
    /// Metadata snapshot of this entry, without the value.
    pub fn info(&self, now: DateTime<Utc>) -> EntryInfo {
        EntryInfo {
            created_at: self.created_at,
            last_accessed_at: self.last_accessed_at,
            access_count: self.access_count,
            expires_at: self.expires_at,
            ttl_remaining_ms: self.ttl_remaining(now).map(|d| d.num_milliseconds()),
        }
    }
}

// == Entry Info ==
/// Read-only metadata about a live entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub access_count: u64,
    pub expires_at: Option<DateTime<Utc>>,
    pub ttl_remaining_ms: Option<i64>,
}
