//! Frequency Cache Module
//!
//! Least Frequently Used eviction. Entries are grouped into buckets by access
//! count; each bucket is an [`OrderedList`] so that ties at the same count are
//! broken by recency. The lowest populated count is tracked so the eviction
//! candidate is always the tail of the minimum bucket.
//!
//! ```text
//!   min_count = 1
//!        │
//!        ▼
//!   count=1: head ─► [c] ◄──► [b] ◄─ tail   (b evicted first)
//!   count=3: head ─► [a] ◄─ tail
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::cache::entry::CacheEntry;
use crate::cache::list::{Handle, OrderedList};
use crate::cache::policy::{EvictionEngine, Insertion, Lookup, Policy};
use crate::cache::DEFAULT_CAPACITY;

/// Where an entry currently lives: its bucket and its position in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    count: u64,
    handle: Handle,
}

// == Frequency Cache ==
/// LFU engine with O(1) get/put and O(log buckets) arbitrary removal.
#[derive(Debug)]
pub struct FrequencyCache<V> {
    /// Key to bucket position
    index: HashMap<String, Slot>,
    /// Access count to entries sharing it, head = most recent
    buckets: BTreeMap<u64, OrderedList<CacheEntry<V>>>,
    /// Lowest populated count, `None` when empty
    min_count: Option<u64>,
    capacity: usize,
    ttl_seconds: u64,
}

impl<V> FrequencyCache<V> {
    // == Constructor ==
    /// Creates an empty LFU cache. `capacity` must be non-zero.
    pub fn new(capacity: usize, ttl_seconds: u64) -> Self {
        Self {
            index: HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            buckets: BTreeMap::new(),
            min_count: None,
            capacity,
            ttl_seconds,
        }
    }

    /// Current access count for `key`, expired or not.
    pub fn frequency(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|slot| slot.count)
    }

    /// Lowest populated access count.
    pub fn min_count(&self) -> Option<u64> {
        self.min_count
    }

    /// Returns the key that would be evicted next.
    pub fn peek_victim(&self) -> Option<&str> {
        let bucket = self.buckets.get(&self.min_count?)?;
        bucket
            .tail()
            .and_then(|handle| bucket.get(handle))
            .map(|entry| entry.key.as_str())
    }

    fn entry(&self, slot: Slot) -> Option<&CacheEntry<V>> {
        self.buckets.get(&slot.count)?.get(slot.handle)
    }

    /// Takes an entry out of its bucket, dropping the bucket once empty.
    /// Returns the entry and whether its bucket emptied.
    fn take_from_bucket(&mut self, slot: Slot) -> Option<(CacheEntry<V>, bool)> {
        let bucket = self.buckets.get_mut(&slot.count)?;
        let entry = bucket.remove(slot.handle)?;
        let emptied = bucket.is_empty();
        if emptied {
            self.buckets.remove(&slot.count);
        }
        Some((entry, emptied))
    }

    // == Promote ==
    /// Moves an entry to the head of the next bucket up.
    fn promote(&mut self, key: &str, slot: Slot) -> Option<Slot> {
        let (mut entry, emptied) = self.take_from_bucket(slot)?;
        entry.access_count = entry.access_count.saturating_add(1);
        let count = entry.access_count;

        let handle = self.buckets.entry(count).or_default().add_head(entry);
        if emptied && self.min_count == Some(slot.count) {
            self.min_count = Some(count);
        }

        let promoted = Slot { count, handle };
        if let Some(current) = self.index.get_mut(key) {
            *current = promoted;
        }
        Some(promoted)
    }

    /// Removes an arbitrary entry, recomputing the minimum if its bucket emptied.
    fn remove_slot(&mut self, key: &str, slot: Slot) -> Option<CacheEntry<V>> {
        self.index.remove(key);
        let (entry, emptied) = self.take_from_bucket(slot)?;
        if emptied && self.min_count == Some(slot.count) {
            self.min_count = self.buckets.keys().next().copied();
        }
        Some(entry)
    }

    // == Evict ==
    /// Evicts the oldest entry among the least frequently used.
    fn evict(&mut self) -> Option<String> {
        let min = self.min_count?;
        let bucket = self.buckets.get_mut(&min)?;
        let entry = bucket.delete_tail()?;
        if bucket.is_empty() {
            self.buckets.remove(&min);
            self.min_count = self.buckets.keys().next().copied();
        }
        self.index.remove(&entry.key);
        Some(entry.key)
    }

    #[cfg(test)]
    pub(crate) fn validate_invariants(&self) {
        let mut total = 0;
        for (count, bucket) in &self.buckets {
            bucket.validate_invariants();
            assert!(!bucket.is_empty(), "empty bucket {} left behind", count);
            total += bucket.len();
        }
        assert_eq!(total, self.index.len(), "index/bucket size mismatch");
        assert!(self.index.len() <= self.capacity, "capacity exceeded");
        assert_eq!(
            self.min_count,
            self.buckets.keys().next().copied(),
            "min_count does not name the lowest bucket"
        );
        for (key, slot) in &self.index {
            let entry = self.entry(*slot).expect("index points at a freed slot");
            assert_eq!(&entry.key, key, "index points at the wrong entry");
            assert_eq!(entry.access_count, slot.count, "entry sits in the wrong bucket");
        }
    }
}

impl<V> EvictionEngine<V> for FrequencyCache<V>
where
    V: Clone + Send + Sync + std::fmt::Debug,
{
    // == Get ==
    fn get(&mut self, key: &str, now: u64) -> Lookup<V> {
        let Some(&slot) = self.index.get(key) else {
            return Lookup::Absent;
        };

        let expired = self
            .entry(slot)
            .map_or(true, |entry| entry.is_expired(self.ttl_seconds, now));
        if expired {
            self.remove_slot(key, slot);
            return Lookup::Expired;
        }

        match self.promote(key, slot).and_then(|slot| self.entry(slot)) {
            Some(entry) => Lookup::Hit(entry.value.clone()),
            None => Lookup::Absent,
        }
    }

    // == Put ==
    fn put(&mut self, key: &str, value: V, now: u64) -> Insertion {
        let mut expired = false;
        if let Some(&slot) = self.index.get(key) {
            let live = self
                .entry(slot)
                .is_some_and(|entry| !entry.is_expired(self.ttl_seconds, now));
            if live {
                if let Some(entry) = self
                    .buckets
                    .get_mut(&slot.count)
                    .and_then(|bucket| bucket.get_mut(slot.handle))
                {
                    entry.refresh(value, now);
                }
                self.promote(key, slot);
                return Insertion::default();
            }
            // Expired: its count history is discarded
            self.remove_slot(key, slot);
            expired = true;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let handle = self
            .buckets
            .entry(1)
            .or_default()
            .add_head(CacheEntry::new(key, value, now));
        self.index.insert(key.to_string(), Slot { count: 1, handle });
        self.min_count = Some(1);
        Insertion { evicted, expired }
    }

    // == Remove Expired ==
    fn remove_expired(&mut self, now: u64) -> Vec<String> {
        let ttl = self.ttl_seconds;
        let expired: Vec<(String, Slot)> = self
            .buckets
            .iter()
            .flat_map(|(&count, bucket)| {
                bucket.handles().filter_map(move |handle| {
                    bucket
                        .get(handle)
                        .filter(|entry| entry.is_expired(ttl, now))
                        .map(|entry| (entry.key.clone(), Slot { count, handle }))
                })
            })
            .collect();

        let mut removed = Vec::with_capacity(expired.len());
        for (key, slot) in expired {
            if self.remove_slot(&key, slot).is_some() {
                removed.push(key);
            }
        }
        removed
    }

    // == Clear ==
    fn clear(&mut self) {
        self.index.clear();
        self.buckets.clear();
        self.min_count = None;
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn policy(&self) -> Policy {
        Policy::Frequency
    }
}
