//! Cache Store Module
//!
//! Policy-agnostic facade over the eviction engines. Callers only see
//! `get`, `put` and `clear`; the engine is chosen once at construction.

use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::{
    current_timestamp_ms, CacheStats, EvictionEngine, FrequencyCache, Lookup, Policy,
    RecencyCache, Ttl, DEFAULT_CAPACITY, MAX_KEY_LENGTH,
};
use crate::config::Config;
use crate::error::{CacheError, ConfigError, Result};

/// A cache store shared between request handlers and background tasks.
pub type SharedCache<V> = Arc<RwLock<CacheStore<V>>>;

// == Cache Options ==
/// Construction-time settings for a [`CacheStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    pub policy: Policy,
    pub ttl: Ttl,
    pub capacity: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            ttl: Ttl::default(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl CacheOptions {
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

// == Cache Store ==
/// Cache facade with pluggable eviction and TTL expiration.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Policy-specific storage and bookkeeping
    engine: Box<dyn EvictionEngine<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// TTL shared by every entry
    ttl: Ttl,
}

impl<V> CacheStore<V>
where
    V: Clone + Send + Sync + Debug + 'static,
{
    // == Constructor ==
    /// Creates a CacheStore backed by the configured policy.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidCapacity`] for a zero capacity.
    pub fn new(options: CacheOptions) -> std::result::Result<Self, ConfigError> {
        if options.capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }

        let ttl_seconds = options.ttl.as_secs();
        let engine: Box<dyn EvictionEngine<V>> = match options.policy {
            Policy::Recency => Box::new(RecencyCache::new(options.capacity, ttl_seconds)),
            Policy::Frequency => Box::new(FrequencyCache::new(options.capacity, ttl_seconds)),
        };

        Ok(Self {
            engine,
            stats: CacheStats::new(options.policy, options.capacity),
            ttl: options.ttl,
        })
    }

    /// Creates a CacheStore from server configuration.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        Self::new(config.cache_options())
    }

    /// Wraps the store for sharing across tasks.
    pub fn into_shared(self) -> SharedCache<V> {
        Arc::new(RwLock::new(self))
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` when the key is absent or its entry has expired; an
    /// expired entry is removed as part of the lookup.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, current_timestamp_ms())
    }

    /// [`get`](Self::get) evaluated at an explicit time (Unix milliseconds).
    pub fn get_at(&mut self, key: &str, now: u64) -> Option<V> {
        match self.engine.get(key, now) {
            Lookup::Hit(value) => {
                self.stats.record_hit();
                Some(value)
            }
            Lookup::Expired => {
                debug!(key, "cache entry expired on read");
                self.stats.record_expirations(1);
                self.stats.record_miss();
                self.stats.set_total_entries(self.engine.len());
                None
            }
            Lookup::Absent => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Stores a value under `key`.
    ///
    /// An existing live entry is overwritten and its TTL restarts. If the cache
    /// is at capacity, one entry is evicted according to the policy first.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidKey`] for an empty key or one longer than
    /// [`MAX_KEY_LENGTH`]. The cache is left untouched in that case.
    pub fn put(&mut self, key: &str, value: V) -> Result<()> {
        self.put_at(key, value, current_timestamp_ms())
    }

    /// [`put`](Self::put) evaluated at an explicit time (Unix milliseconds).
    pub fn put_at(&mut self, key: &str, value: V, now: u64) -> Result<()> {
        validate_key(key)?;

        let insertion = self.engine.put(key, value, now);
        if insertion.expired {
            debug!(key, "replaced expired cache entry");
            self.stats.record_expirations(1);
        }
        if let Some(evicted) = insertion.evicted {
            debug!(evicted = %evicted, policy = %self.engine.policy(), "evicted cache entry");
            self.stats.record_eviction();
        }
        self.stats.set_total_entries(self.engine.len());
        Ok(())
    }

    // == Clear ==
    /// Removes every entry. Statistics counters keep running.
    pub fn clear(&mut self) {
        let dropped = self.engine.len();
        self.engine.clear();
        self.stats.set_total_entries(0);
        info!(dropped, "cache cleared");
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        self.cleanup_expired_at(current_timestamp_ms())
    }

    /// [`cleanup_expired`](Self::cleanup_expired) evaluated at an explicit time.
    pub fn cleanup_expired_at(&mut self, now: u64) -> usize {
        let removed = self.engine.remove_expired(now);
        for key in &removed {
            debug!(key = %key, "swept expired cache entry");
        }
        self.stats.record_expirations(removed.len());
        self.stats.set_total_entries(self.engine.len());
        removed.len()
    }
}

impl<V> CacheStore<V> {
    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.engine.len());
        stats
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.engine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engine.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.engine.capacity()
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    pub fn policy(&self) -> Policy {
        self.engine.policy()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
