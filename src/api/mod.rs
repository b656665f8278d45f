//! API Module
//!
//! HTTP handlers, routing and the response cache layer.
//!
//! # Endpoints
//! - `GET /compute/:n` - Cached demo computation
//! - `GET /stats` - Get cache statistics
//! - `DELETE /cache` - Clear the cache
//! - `GET /health` - Health check endpoint

pub mod cache_layer;
pub mod handlers;
pub mod routes;

pub use cache_layer::{cache_key, response_cache};
pub use handlers::*;
pub use routes::create_router;
