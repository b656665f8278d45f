//! Recency Cache Module
//!
//! Least Recently Used eviction: a HashMap from key to list handle, backed by
//! a single [`OrderedList`] whose tail is the next eviction candidate.

use std::collections::HashMap;

use crate::cache::entry::CacheEntry;
use crate::cache::list::{Handle, OrderedList};
use crate::cache::policy::{EvictionEngine, Insertion, Lookup, Policy};
use crate::cache::DEFAULT_CAPACITY;

// == Recency Cache ==
/// LRU engine with O(1) get and put.
#[derive(Debug)]
pub struct RecencyCache<V> {
    /// Key to list position
    index: HashMap<String, Handle>,
    /// Entries ordered by access, head = most recent
    order: OrderedList<CacheEntry<V>>,
    capacity: usize,
    ttl_seconds: u64,
}

impl<V> RecencyCache<V> {
    // == Constructor ==
    /// Creates an empty LRU cache. `capacity` must be non-zero; the facade
    /// validates it before constructing an engine.
    pub fn new(capacity: usize, ttl_seconds: u64) -> Self {
        // Storage grows on demand past the default size
        let initial = capacity.min(DEFAULT_CAPACITY);
        Self {
            index: HashMap::with_capacity(initial),
            order: OrderedList::with_capacity(initial),
            capacity,
            ttl_seconds,
        }
    }

    /// Returns the key that would be evicted next.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.order
            .tail()
            .and_then(|handle| self.order.get(handle))
            .map(|entry| entry.key.as_str())
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let entry = self.order.delete_tail()?;
        self.index.remove(&entry.key);
        Some(entry.key)
    }

    fn remove_handle(&mut self, key: &str, handle: Handle) {
        self.order.remove(handle);
        self.index.remove(key);
    }

    #[cfg(test)]
    pub(crate) fn validate_invariants(&self) {
        self.order.validate_invariants();
        assert_eq!(self.index.len(), self.order.len(), "index/list length mismatch");
        assert!(self.index.len() <= self.capacity, "capacity exceeded");
        for (key, handle) in &self.index {
            let entry = self.order.get(*handle).expect("index points at a freed slot");
            assert_eq!(&entry.key, key, "index points at the wrong entry");
        }
    }
}

impl<V> EvictionEngine<V> for RecencyCache<V>
where
    V: Clone + Send + Sync + std::fmt::Debug,
{
    // == Get ==
    fn get(&mut self, key: &str, now: u64) -> Lookup<V> {
        let Some(&handle) = self.index.get(key) else {
            return Lookup::Absent;
        };

        let expired = self
            .order
            .get(handle)
            .map_or(true, |entry| entry.is_expired(self.ttl_seconds, now));
        if expired {
            self.remove_handle(key, handle);
            return Lookup::Expired;
        }

        self.order.move_to_head(handle);
        match self.order.get(handle) {
            Some(entry) => Lookup::Hit(entry.value.clone()),
            None => Lookup::Absent,
        }
    }

    // == Put ==
    fn put(&mut self, key: &str, value: V, now: u64) -> Insertion {
        let mut expired = false;
        if let Some(&handle) = self.index.get(key) {
            let live = self
                .order
                .get(handle)
                .is_some_and(|entry| !entry.is_expired(self.ttl_seconds, now));
            if live {
                if let Some(entry) = self.order.get_mut(handle) {
                    entry.refresh(value, now);
                }
                self.order.move_to_head(handle);
                return Insertion::default();
            }
            // Expired: discard its history and insert fresh below
            self.remove_handle(key, handle);
            expired = true;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        let handle = self.order.add_head(CacheEntry::new(key, value, now));
        self.index.insert(key.to_string(), handle);
        Insertion { evicted, expired }
    }

    // == Remove Expired ==
    fn remove_expired(&mut self, now: u64) -> Vec<String> {
        let expired: Vec<Handle> = self
            .order
            .handles()
            .filter(|&handle| {
                self.order
                    .get(handle)
                    .is_some_and(|entry| entry.is_expired(self.ttl_seconds, now))
            })
            .collect();

        let mut removed = Vec::with_capacity(expired.len());
        for handle in expired {
            if let Some(entry) = self.order.remove(handle) {
                self.index.remove(&entry.key);
                removed.push(entry.key);
            }
        }
        removed
    }

    // == Clear ==
    fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn policy(&self) -> Policy {
        Policy::Recency
    }
}
