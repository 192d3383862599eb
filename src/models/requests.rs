//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming request bodies and query strings.

use serde::Deserialize;

use crate::tracking::Value;

/// Request body for POST /store
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRequest {
    /// The value to store: string, integer, float or byte array
    pub value: Value,
}

/// How GET /get/:key decodes the stored bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    #[default]
    Str,
    Int,
}

/// Query string for GET /get/:key
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetQuery {
    /// Decoding to apply (`?as=int`), text by default
    #[serde(rename = "as", default)]
    pub format: ValueFormat,
}

/// Query string for GET /page
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// Absolute http(s) URL to fetch
    pub url: String,
}

impl PageQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Some("URL must start with http:// or https://".to_string());
        }
        None
    }
}
