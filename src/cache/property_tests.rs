//! Property-Based Tests for Cache Module
//!
//! Uses proptest to drive both eviction engines through random operation
//! sequences, checking them against a straightforward reference model and
//! validating list/bucket invariants after every step.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::{
    is_expired, CacheOptions, CacheStore, EvictionEngine, FrequencyCache, Lookup, Policy,
    RecencyCache, Ttl,
};

// == Test Configuration ==
const TEST_TTL_SECS: u64 = 5;

// == Strategies ==
/// Small key space so that overwrites, hits and evictions all happen often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: u32 },
    Get { key: String },
    Advance { ms: u64 },
    Sweep,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => (0u64..3_000).prop_map(|ms| CacheOp::Advance { ms }),
        1 => Just(CacheOp::Sweep),
    ]
}

// == Reference Model ==
/// Naive O(n) cache with the same observable semantics as the engines.
struct ModelEntry {
    value: u32,
    inserted_at: u64,
    count: u64,
    last_touch: u64,
}

struct Model {
    policy: Policy,
    capacity: usize,
    entries: HashMap<String, ModelEntry>,
    tick: u64,
}

impl Model {
    fn new(policy: Policy, capacity: usize) -> Self {
        Self {
            policy,
            capacity,
            entries: HashMap::new(),
            tick: 0,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn live(&self, key: &str, now: u64) -> bool {
        self.entries
            .get(key)
            .is_some_and(|e| !is_expired(e.inserted_at, TEST_TTL_SECS, now))
    }

    fn get(&mut self, key: &str, now: u64) -> Option<u32> {
        if !self.live(key, now) {
            self.entries.remove(key);
            return None;
        }
        let tick = self.next_tick();
        let entry = self.entries.get_mut(key)?;
        entry.count += 1;
        entry.last_touch = tick;
        Some(entry.value)
    }

    fn put(&mut self, key: &str, value: u32, now: u64) {
        let tick = self.next_tick();
        if self.live(key, now) {
            if let Some(entry) = self.entries.get_mut(key) {
                entry.value = value;
                entry.inserted_at = now;
                entry.count += 1;
                entry.last_touch = tick;
            }
            return;
        }
        self.entries.remove(key);

        if self.entries.len() >= self.capacity {
            let policy = self.policy;
            let victim = self
                .entries
                .iter()
                .min_by_key(|(_, e)| match policy {
                    Policy::Recency => (0, e.last_touch),
                    Policy::Frequency => (e.count, e.last_touch),
                })
                .map(|(k, _)| k.clone());
            if let Some(victim) = victim {
                self.entries.remove(&victim);
            }
        }

        self.entries.insert(
            key.to_string(),
            ModelEntry {
                value,
                inserted_at: now,
                count: 1,
                last_touch: tick,
            },
        );
    }

    fn sweep(&mut self, now: u64) {
        self.entries
            .retain(|_, e| !is_expired(e.inserted_at, TEST_TTL_SECS, now));
    }
}

/// Runs `ops` against an engine and the model, comparing every observation.
fn check_against_model<E>(
    engine: &mut E,
    policy: Policy,
    capacity: usize,
    ops: Vec<CacheOp>,
    validate: impl Fn(&E),
) -> Result<(), TestCaseError>
where
    E: EvictionEngine<u32>,
{
    let mut model = Model::new(policy, capacity);
    let mut now = 0u64;

    for op in ops {
        match op {
            CacheOp::Put { key, value } => {
                engine.put(&key, value, now);
                model.put(&key, value, now);
            }
            CacheOp::Get { key } => {
                let actual = engine.get(&key, now).into_hit();
                let expected = model.get(&key, now);
                prop_assert_eq!(actual, expected, "get({}) diverged at t={}", key, now);
            }
            CacheOp::Advance { ms } => now += ms,
            CacheOp::Sweep => {
                engine.remove_expired(now);
                model.sweep(now);
            }
        }

        validate(engine);
        prop_assert!(engine.len() <= capacity, "capacity exceeded");
        prop_assert_eq!(engine.len(), model.entries.len(), "entry count diverged");
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Recency engine matches the reference model and keeps its list intact
    #[test]
    fn prop_recency_matches_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut engine = RecencyCache::new(capacity, TEST_TTL_SECS);
        check_against_model(&mut engine, Policy::Recency, capacity, ops, |e: &RecencyCache<u32>| {
            e.validate_invariants()
        })?;
    }

    // Frequency engine matches the reference model and keeps its buckets intact
    #[test]
    fn prop_frequency_matches_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let mut engine = FrequencyCache::new(capacity, TEST_TTL_SECS);
        check_against_model(&mut engine, Policy::Frequency, capacity, ops, |e: &FrequencyCache<u32>| {
            e.validate_invariants()
        })?;
    }

    // A value written is read back until overwritten, evicted or expired
    #[test]
    fn prop_roundtrip_storage(
        key in "[a-zA-Z0-9_]{1,64}",
        value in any::<u32>(),
        frequency in any::<bool>()
    ) {
        let policy = if frequency { Policy::Frequency } else { Policy::Recency };
        let mut store = CacheStore::new(CacheOptions::default().with_policy(policy)).unwrap();

        store.put(&key, value).unwrap();
        prop_assert_eq!(store.get(&key), Some(value));
    }

    // Clearing always yields misses for every previously stored key
    #[test]
    fn prop_clear_then_miss(
        keys in prop::collection::vec("[a-z]{1,8}", 1..30),
        frequency in any::<bool>()
    ) {
        let policy = if frequency { Policy::Frequency } else { Policy::Recency };
        let options = CacheOptions::default().with_policy(policy).with_capacity(10);
        let mut store = CacheStore::new(options).unwrap();

        for key in &keys {
            store.put(key, 1).unwrap();
        }
        store.clear();

        prop_assert!(store.is_empty());
        for key in &keys {
            prop_assert_eq!(store.get(key), None);
        }
    }

    // Expiration is monotonic: once expired, expired for every later instant
    #[test]
    fn prop_expiration_monotonic(
        inserted_at in 0u64..1_000_000,
        ttl in 0u64..=86_400,
        now in 0u64..200_000_000,
        later in 0u64..200_000_000
    ) {
        if is_expired(inserted_at, ttl, now) {
            prop_assert!(is_expired(inserted_at, ttl, now + later));
        }
    }

    // Composite TTL strings sum their units
    #[test]
    fn prop_ttl_string_sums_units(h in 0u64..30, m in 0u64..120, s in 0u64..120) {
        let total = h * 3600 + m * 60 + s;
        let parsed = format!("{}h,{}m,{}s", h, m, s).parse::<Ttl>();
        if total <= 86_400 {
            prop_assert_eq!(parsed.unwrap().as_secs(), total);
        } else {
            prop_assert!(parsed.is_err());
        }
    }
}

// Frequency eviction among equal counts always removes the least recently touched key
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_frequency_tiebreak_by_recency(
        order in Just(vec!["a", "b", "c", "d"]).prop_shuffle()
    ) {
        let mut engine: FrequencyCache<u32> = FrequencyCache::new(4, TEST_TTL_SECS);
        for key in ["a", "b", "c", "d"] {
            engine.put(key, 0, 0);
        }
        // Every key reaches count 2, touched in `order`
        for key in &order {
            prop_assert_eq!(engine.get(key, 0), Lookup::Hit(0));
        }

        prop_assert_eq!(engine.put("e", 1, 0).evicted, Some(order[0].to_string()));
        engine.validate_invariants();
    }
}
