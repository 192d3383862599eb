//! Cache Tracker - call tracking and page caching over a key-value store
//!
//! Provides a call-counting, call-logging value cache with replay, and a
//! time-boxed HTTP page cache, over Redis or an in-memory store.

pub mod api;
pub mod config;
pub mod error;
pub mod kv;
pub mod models;
pub mod tasks;
pub mod tracking;
pub mod web;

pub use api::AppState;
pub use config::{Config, StoreBackend};
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
