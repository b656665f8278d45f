//! Error types for the response cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Operational failures of cache operations and request handling.
///
/// Lookup misses are not errors; `get` reports them as `None`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or too long
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Config Error Enum ==
/// Rejected configuration. No cache is constructed when one of these is returned.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// TTL string is not plain seconds or `<N>h,<N>m,<N>s`
    #[error("Invalid TTL '{0}': expected seconds or a list like \"1h,30m,15s\"")]
    InvalidTtl(String),

    /// TTL outside 0..=86400 seconds
    #[error("TTL of {0}s is out of range (0-86400)")]
    TtlOutOfRange(u64),

    /// Unknown eviction policy name
    #[error("Unknown eviction policy '{0}': expected recency or frequency")]
    InvalidPolicy(String),

    /// Capacity must be at least one entry
    #[error("Cache capacity must be greater than zero")]
    InvalidCapacity,

    /// Environment variable could not be parsed
    #[error("Invalid value '{value}' for {name}")]
    InvalidValue { name: &'static str, value: String },
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) | CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
