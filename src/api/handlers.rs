//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::debug;

use crate::cache::{CacheStore, SharedCache};
use crate::config::Config;
use crate::error::{CacheError, ConfigError, Result};
use crate::models::{
    CacheHit, CachedResponse, ClearResponse, ComputeResponse, HealthResponse, StatsResponse,
};

/// Largest Fibonacci index whose value fits in a `u128`.
pub const MAX_FIBONACCI_INDEX: u32 = 186;

/// Application state shared across all handlers and the cache layer.
///
/// Contains the response cache wrapped in Arc<RwLock<>> for thread-safe access.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe response cache
    pub cache: SharedCache<CachedResponse>,
    /// Answer cache hits directly instead of running the handler
    pub respond_on_hit: bool,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore<CachedResponse>, respond_on_hit: bool) -> Self {
        Self {
            cache: cache.into_shared(),
            respond_on_hit,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails if the configured cache options are rejected.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let cache = CacheStore::from_config(config)?;
        Ok(Self::new(cache, config.respond_on_hit))
    }
}

/// Handler for GET /compute/:n
///
/// Computes the n-th Fibonacci number. Stands in for an expensive endpoint
/// sitting behind the response cache.
pub async fn compute_handler(
    Path(n): Path<u32>,
    cached: Option<Extension<CacheHit>>,
) -> Result<Json<ComputeResponse>> {
    let value = fibonacci(n).ok_or_else(|| {
        CacheError::InvalidRequest(format!(
            "n must be at most {}, got {}",
            MAX_FIBONACCI_INDEX, n
        ))
    })?;

    let revalidated = cached.is_some();
    if let Some(Extension(CacheHit(previous))) = &cached {
        debug!(n, cached_bytes = previous.body.len(), "recomputing over cached copy");
    }

    Ok(Json(ComputeResponse::new(n, value, revalidated)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    // Acquire read lock for stats
    let cache = state.cache.read().await;
    Json(StatsResponse::new(&cache.stats(), cache.ttl().as_secs()))
}

/// Handler for DELETE /cache
///
/// Drops every cached response.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    let cleared = cache.len();
    cache.clear();

    Json(ClearResponse::new(cleared))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Iterative Fibonacci, `None` once the result overflows.
fn fibonacci(n: u32) -> Option<u128> {
    if n == 0 {
        return Some(0);
    }
    let (mut previous, mut current): (u128, u128) = (0, 1);
    for _ in 1..n {
        let next = previous.checked_add(current)?;
        previous = current;
        current = next;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheOptions, Policy};

    fn test_state() -> AppState {
        let cache = CacheStore::new(CacheOptions::default().with_capacity(100)).unwrap();
        AppState::new(cache, true)
    }

    #[test]
    fn test_fibonacci() {
        assert_eq!(fibonacci(0), Some(0));
        assert_eq!(fibonacci(1), Some(1));
        assert_eq!(fibonacci(10), Some(55));
        assert_eq!(fibonacci(90), Some(2_880_067_194_370_816_120));
        assert!(fibonacci(MAX_FIBONACCI_INDEX).is_some());
        assert_eq!(fibonacci(MAX_FIBONACCI_INDEX + 1), None);
    }

    #[tokio::test]
    async fn test_compute_handler() {
        let response = compute_handler(Path(10), None).await.unwrap();
        assert_eq!(response.n, 10);
        assert_eq!(response.fibonacci, "55");
        assert!(!response.revalidated);
    }

    #[tokio::test]
    async fn test_compute_handler_rejects_overflow() {
        let result = compute_handler(Path(MAX_FIBONACCI_INDEX + 1), None).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
        assert_eq!(response.policy, Policy::Recency);
        assert_eq!(response.capacity, 100);
    }

    #[tokio::test]
    async fn test_clear_handler() {
        let state = test_state();
        {
            let mut cache = state.cache.write().await;
            let (parts, _) = axum::response::Response::new(()).into_parts();
            cache
                .put("GET /compute/1", CachedResponse::from_parts(&parts, Default::default()))
                .unwrap();
        }

        let response = clear_handler(State(state.clone())).await;
        assert_eq!(response.cleared, 1);
        assert!(state.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
