//! Eviction Policy Module
//!
//! The seam between the cache facade and the interchangeable eviction engines.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;

// == Policy ==
/// Which eviction engine backs a cache instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Evict the least recently used entry
    #[default]
    Recency,
    /// Evict the least frequently used entry, oldest first among ties
    Frequency,
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recency" | "lru" => Ok(Policy::Recency),
            "frequency" | "lfu" => Ok(Policy::Frequency),
            other => Err(ConfigError::InvalidPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Recency => f.write_str("recency"),
            Policy::Frequency => f.write_str("frequency"),
        }
    }
}

// == Lookup ==
/// Outcome of an engine lookup.
///
/// The facade folds `Expired` and `Absent` into a plain miss; the split only
/// feeds statistics and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    Hit(V),
    Expired,
    Absent,
}

#[cfg(test)]
impl<V> Lookup<V> {
    pub(crate) fn into_hit(self) -> Option<V> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Expired | Lookup::Absent => None,
        }
    }
}

// == Insertion ==
/// Side effects of a single engine `put`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Insertion {
    /// Key evicted to make room, if any
    pub evicted: Option<String>,
    /// Whether a stale entry under the same key was dropped first
    pub expired: bool,
}

// == Eviction Engine ==
/// Storage plus eviction bookkeeping for one policy.
///
/// All timestamps are Unix milliseconds supplied by the caller, so engines
/// never read the clock themselves.
pub trait EvictionEngine<V>: fmt::Debug + Send + Sync {
    /// Looks up `key`, updating recency/frequency on a hit and removing the
    /// entry if it has expired.
    fn get(&mut self, key: &str, now: u64) -> Lookup<V>;

    /// Inserts or overwrites `key`. An expired entry under `key` is dropped
    /// and replaced by a fresh one.
    fn put(&mut self, key: &str, value: V, now: u64) -> Insertion;

    /// Removes every expired entry and returns their keys.
    fn remove_expired(&mut self, now: u64) -> Vec<String>;

    /// Drops every entry, leaving the engine as freshly constructed.
    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn policy(&self) -> Policy;
}
