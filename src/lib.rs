//! Resp Cache - A pluggable response cache
//!
//! Key-value cache with recency (LRU) or frequency (LFU) eviction and TTL
//! expiration, plus an axum layer that serves repeated requests from it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheOptions, CacheStore, Policy, Ttl};
pub use config::Config;
pub use error::{CacheError, ConfigError};
pub use tasks::spawn_cleanup_task;
