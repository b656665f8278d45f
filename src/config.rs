//! Configuration Module
//!
//! Handles loading and validating server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{CacheOptions, Policy, Ttl, DEFAULT_CAPACITY};
use crate::error::ConfigError;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Eviction policy for the response cache
    pub policy: Policy,
    /// TTL shared by every cached response
    pub ttl: Ttl,
    /// Maximum number of cached responses
    pub capacity: usize,
    /// Serve cached responses directly instead of passing them to the handler
    pub respond_on_hit: bool,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_POLICY` - `recency`/`lru` or `frequency`/`lfu` (default: recency)
    /// - `CACHE_TTL` - seconds or `"1h,30m,15s"`, at most one day (default: 86400)
    /// - `CACHE_CAPACITY` - maximum cached responses (default: 1000)
    /// - `CACHE_RESPOND_ON_HIT` - `true`/`false` (default: true)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - sweep frequency in seconds (default: 60)
    ///
    /// # Errors
    /// Any variable that is set but malformed is rejected rather than defaulted.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let policy = match lookup("CACHE_POLICY") {
            Some(value) => value.parse()?,
            None => defaults.policy,
        };
        let ttl = match lookup("CACHE_TTL") {
            Some(value) => value.parse()?,
            None => defaults.ttl,
        };
        let capacity = parse_var(&lookup, "CACHE_CAPACITY", defaults.capacity)?;
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }

        Ok(Self {
            policy,
            ttl,
            capacity,
            respond_on_hit: parse_var(&lookup, "CACHE_RESPOND_ON_HIT", defaults.respond_on_hit)?,
            server_port: parse_var(&lookup, "SERVER_PORT", defaults.server_port)?,
            cleanup_interval: parse_var(&lookup, "CLEANUP_INTERVAL", defaults.cleanup_interval)?,
        })
    }

    /// Cache construction settings derived from this config.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            policy: self.policy,
            ttl: self.ttl,
            capacity: self.capacity,
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: Policy::Recency,
            ttl: Ttl::default(),
            capacity: DEFAULT_CAPACITY,
            respond_on_hit: true,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}
