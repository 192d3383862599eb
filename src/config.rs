//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

use crate::web::CACHE_WINDOW_SECS;

/// Which key-value store implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process keyspace with lazy expiry and a background sweeper
    Memory,
    /// Redis server reached through `redis_url`
    Redis,
}

impl StoreBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "redis" => Some(Self::Redis),
            _ => None,
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key-value store backend
    pub backend: StoreBackend,
    /// Redis connection URL, used when `backend` is `Redis`
    pub redis_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds (memory backend only)
    pub cleanup_interval: u64,
    /// Page cache window in seconds
    pub page_cache_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis connection URL (default: redis://127.0.0.1:6379/0)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `PAGE_CACHE_TTL` - Page cache window in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: env::var("STORE_BACKEND")
                .ok()
                .and_then(|v| StoreBackend::parse(&v))
                .unwrap_or(defaults.backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            page_cache_ttl: env::var("PAGE_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.page_cache_ttl),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            server_port: 3000,
            cleanup_interval: 1,
            page_cache_ttl: CACHE_WINDOW_SECS,
        }
    }
}
