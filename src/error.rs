//! Error types for the cache tracker
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
/// Unified error type for the store, tracking and page cache layers.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failure reported by the Redis backend, passed through verbatim
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    /// Operation against a key holding the wrong kind of value
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value: {0}")]
    WrongType(String),

    /// INCR on a value that is not a base-10 integer
    #[error("Value is not an integer: {0}")]
    NotAnInteger(String),

    /// Stored bytes rejected by a read transform
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Outbound fetch failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Call-log entry could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key not found (HTTP layer only; the store reports absence as `None`)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::WrongType(_)
            | CacheError::NotAnInteger(_)
            | CacheError::InvalidValue(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Fetch(_) => StatusCode::BAD_GATEWAY,
            CacheError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Serialization(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache tracker.
pub type Result<T> = std::result::Result<T, CacheError>;
