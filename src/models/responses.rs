//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::tracking::{Call, CallHistory, Value};

/// Response body for POST /store
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Generated key the value was stored under
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The decoded value
    pub value: Value,
}

/// Response body for GET /replay/:operation
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    /// Operation name
    pub operation: String,
    /// Counter value (invocation attempts)
    pub calls: i64,
    /// Paired call-log entries in call order
    pub history: Vec<Call>,
}

impl ReplayResponse {
    pub fn new(calls: i64, history: &CallHistory) -> Self {
        Self {
            operation: history.operation.clone(),
            calls,
            history: history.calls().collect(),
        }
    }
}

/// Response body for GET /page
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub url: String,
    pub content: String,
    /// Accesses so far, including this one
    pub access_count: i64,
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
