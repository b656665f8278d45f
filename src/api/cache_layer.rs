//! Response Cache Layer
//!
//! Axum middleware placing the cache in front of expensive handlers. GET
//! requests are keyed by method, path and query. On a hit the cached response
//! is replayed (or handed to the handler when `respond_on_hit` is off); on a
//! miss the handler runs and a successful response is buffered and stored.

use axum::{
    body::{to_bytes, Body, HttpBody},
    extract::{Request, State},
    http::{HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::handlers::AppState;
use crate::error::CacheError;
use crate::models::{CacheHit, CachedResponse, CACHE_STATUS_HEADER};

/// Responses with larger bodies pass through without being cached.
pub const MAX_CACHED_BODY_SIZE: usize = 1024 * 1024; // 1 MB

/// Builds the cache key for a request.
pub fn cache_key(request: &Request) -> String {
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| request.uri().path());
    format!("{} {}", request.method(), target)
}

/// Middleware serving and populating the response cache.
pub async fn response_cache(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = cache_key(&request);
    // Lock is released before the handler runs
    let cached = state.cache.write().await.get(&key);

    if let Some(cached) = cached {
        if state.respond_on_hit {
            debug!(
                key = %key,
                content_type = cached.content_type().unwrap_or("unknown"),
                "serving cached response"
            );
            return cached.into_response_with("HIT");
        }
        request.extensions_mut().insert(CacheHit(cached));
    }

    let response = next.run(request).await;
    if !response.status().is_success() {
        return response;
    }

    // Bodies that may exceed the limit stream through without buffering
    let cacheable = response
        .body()
        .size_hint()
        .upper()
        .is_some_and(|upper| upper <= MAX_CACHED_BODY_SIZE as u64);
    if !cacheable {
        debug!(key = %key, "response size unknown or over limit, not cached");
        return with_cache_status(response, "MISS");
    }

    let (parts, body) = response.into_parts();
    let body = match to_bytes(body, MAX_CACHED_BODY_SIZE).await {
        Ok(body) => body,
        Err(err) => {
            warn!(key = %key, error = %err, "failed to buffer response body");
            return CacheError::Internal("failed to read response body".to_string())
                .into_response();
        }
    };

    let entry = CachedResponse::from_parts(&parts, body.clone());
    if let Err(err) = state.cache.write().await.put(&key, entry) {
        warn!(key = %key, error = %err, "response not cached");
    }

    with_cache_status(Response::from_parts(parts, Body::from(body)), "MISS")
}

fn with_cache_status(mut response: Response, status: &'static str) -> Response {
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(status));
    response
}
