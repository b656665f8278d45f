//! Models for the cache server API
//!
//! The cached response payload and the DTOs serialized into HTTP response bodies.

pub mod cached;
pub mod responses;

// Re-export commonly used types
pub use cached::{CacheHit, CachedResponse, CACHE_STATUS_HEADER};
pub use responses::{ClearResponse, ComputeResponse, HealthResponse, StatsResponse};
