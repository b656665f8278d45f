//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, Policy};

/// Response body for the demo computation (GET /compute/:n)
#[derive(Debug, Clone, Serialize)]
pub struct ComputeResponse {
    /// Requested Fibonacci index
    pub n: u32,
    /// F(n), rendered as a string since it can exceed JSON's safe integer range
    pub fibonacci: String,
    /// When the value was computed, in RFC 3339 format
    pub computed_at: String,
    /// Whether a cached copy existed when this value was recomputed
    pub revalidated: bool,
}

impl ComputeResponse {
    pub fn new(n: u32, fibonacci: u128, revalidated: bool) -> Self {
        Self {
            n,
            fibonacci: fibonacci.to_string(),
            computed_at: chrono::Utc::now().to_rfc3339(),
            revalidated,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub policy: Policy,
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries dropped after their TTL elapsed
    pub expirations: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    pub capacity: usize,
    pub ttl_seconds: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: &CacheStats, ttl_seconds: u64) -> Self {
        Self {
            policy: stats.policy,
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            capacity: stats.capacity,
            ttl_seconds,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the clear endpoint (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of entries dropped
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cached responses", cleared),
            cleared,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
