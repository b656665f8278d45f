//! Cache Entry Module
//!
//! Defines the stored record and the expiration rule shared by every policy.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached record.
///
/// The value is opaque to the cache: it is stored and handed back, never inspected.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The key this entry is indexed under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Insertion timestamp (Unix milliseconds), refreshed on overwrite
    pub inserted_at: u64,
    /// Number of accesses, starting at 1 (only advanced by the frequency policy)
    pub access_count: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped at `now` with an access count of 1.
    pub fn new(key: impl Into<String>, value: V, now: u64) -> Self {
        Self {
            key: key.into(),
            value,
            inserted_at: now,
            access_count: 1,
        }
    }

    // == Is Expired ==
    /// Checks the entry against the shared TTL at time `now`.
    pub fn is_expired(&self, ttl_seconds: u64, now: u64) -> bool {
        is_expired(self.inserted_at, ttl_seconds, now)
    }

    // == Refresh ==
    /// Replaces the value and restarts the TTL clock.
    pub fn refresh(&mut self, value: V, now: u64) {
        self.value = value;
        self.inserted_at = now;
    }
}

// == Expiration Rule ==
/// Returns `true` once `ttl_seconds` have fully elapsed since `inserted_at`.
///
/// Boundary condition: an entry is expired when the elapsed time is greater
/// than or equal to the TTL, so a TTL of 0 expires immediately. A clock that
/// moved backwards counts as zero elapsed time.
pub fn is_expired(inserted_at: u64, ttl_seconds: u64, now: u64) -> bool {
    now.saturating_sub(inserted_at) >= ttl_seconds.saturating_mul(1000)
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
