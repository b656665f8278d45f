//! Cached response payload
//!
//! The value stored by the response cache. The cache engine never looks
//! inside it; only the HTTP layer builds and replays it.

use axum::{
    body::{Body, Bytes},
    http::{response::Parts, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Header reporting whether a response came from the cache.
pub const CACHE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CachedResponse {
    /// Captures a response from its parts and buffered body.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        Self {
            status: parts.status,
            headers: parts.headers.clone(),
            body,
        }
    }

    /// Content type of the cached body, if one was recorded.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Rebuilds the response with the cache status header set.
    pub fn into_response_with(self, cache_status: &'static str) -> Response {
        let mut response = (self.status, self.headers, Body::from(self.body)).into_response();
        response
            .headers_mut()
            .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(cache_status));
        response
    }
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        self.into_response_with("HIT")
    }
}

/// Request extension carrying a cached copy to the handler when the cache
/// is configured not to answer hits itself.
#[derive(Debug, Clone)]
pub struct CacheHit(pub CachedResponse);
