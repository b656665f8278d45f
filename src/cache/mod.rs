//! Cache Module
//!
//! Pluggable key-value cache with recency (LRU) or frequency (LFU) eviction
//! and a TTL applied uniformly across both policies.

mod entry;
mod lfu;
mod list;
mod lru;
mod policy;
mod stats;
mod store;
mod ttl;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, is_expired, CacheEntry};
pub use lfu::FrequencyCache;
pub use list::{Handle, OrderedList};
pub use lru::RecencyCache;
pub use policy::{EvictionEngine, Insertion, Lookup, Policy};
pub use stats::CacheStats;
pub use store::{CacheOptions, CacheStore, SharedCache};
pub use ttl::Ttl;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Upper bound on the configurable TTL (one day)
pub const MAX_TTL_SECONDS: u64 = 86_400;

/// Entry capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 1000;
