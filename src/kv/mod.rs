//! Key-Value Store Module
//!
//! The store collaborator shared by call tracking and the page cache, with an
//! in-memory backend (lazy TTL expiry) and a Redis backend.

mod entry;
mod memory;
mod redis_store;


use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::{Entry, Slot};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

// == Store Trait ==
/// Redis-style key-value operations.
///
/// Reads of a missing or expired key return `None` rather than an error.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the bytes stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`, discarding any previous TTL.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Stores `value` under `key`, removed after `ttl_seconds`.
    async fn setex(&self, key: &str, ttl_seconds: u64, value: Vec<u8>) -> Result<()>;

    /// Increments the integer under `key` (absent counts as 0) and returns it.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Appends `value` to the list under `key` and returns the new length.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Returns list elements `start..=end`; negative indices count from the end.
    async fn lrange(&self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>>;

    /// Removes every key.
    async fn flushdb(&self) -> Result<()>;
}

/// Resolves an inclusive LRANGE window against a list of `len` elements.
///
/// Returns `None` when the window selects nothing.
pub(crate) fn lrange_bounds(len: usize, start: isize, end: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let end = if end < 0 { len + end } else { end.min(len - 1) };

    if len == 0 || start > end || start >= len {
        None
    } else {
        Some((start as usize, end as usize))
    }
}
