//! Memory Store Module
//!
//! In-process keyspace with Redis semantics and lazy TTL expiration.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::kv::{lrange_bounds, Entry, KvStore, Slot};

// == Memory Store ==
/// Keyspace held in a `HashMap` behind an async `RwLock`.
///
/// Expired entries are dropped the first time they are touched and by
/// [`MemoryStore::cleanup_expired`], which the background sweeper calls.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

/// Returns the live entry for `key`, removing it first if it has expired.
fn live_entry<'a>(entries: &'a mut HashMap<String, Entry>, key: &str) -> Option<&'a mut Entry> {
    if entries.get(key).is_some_and(Entry::is_expired) {
        entries.remove(key);
        debug!(key, "Dropped expired key on access");
    }
    entries.get_mut(key)
}

fn parse_counter(key: &str, raw: &[u8]) -> Result<i64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|text| text.parse::<i64>().ok())
        .ok_or_else(|| CacheError::NotAnInteger(key.to_string()))
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the keyspace.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of keys currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(Entry {
                slot: Slot::Bytes(value),
                ..
            }) => Ok(Some(value.clone())),
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry::new(Slot::Bytes(value), None));
        Ok(())
    }

    async fn setex(&self, key: &str, ttl_seconds: u64, value: Vec<u8>) -> Result<()> {
        if ttl_seconds == 0 {
            return Err(CacheError::InvalidRequest(format!(
                "invalid expire time for key '{}'",
                key
            )));
        }

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry::new(Slot::Bytes(value), Some(ttl_seconds)),
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(entry) => {
                let Slot::Bytes(raw) = &mut entry.slot else {
                    return Err(CacheError::WrongType(key.to_string()));
                };
                let next = parse_counter(key, raw)?
                    .checked_add(1)
                    .ok_or_else(|| CacheError::NotAnInteger(key.to_string()))?;
                // Rewrite in place so any TTL survives the increment
                *raw = next.to_string().into_bytes();
                Ok(next)
            }
            None => {
                entries.insert(key.to_string(), Entry::new(Slot::Bytes(b"1".to_vec()), None));
                Ok(1)
            }
        }
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(Entry {
                slot: Slot::List(items),
                ..
            }) => {
                items.push(value);
                Ok(items.len())
            }
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => {
                entries.insert(key.to_string(), Entry::new(Slot::List(vec![value]), None));
                Ok(1)
            }
        }
    }

    async fn lrange(&self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(Entry {
                slot: Slot::List(items),
                ..
            }) => Ok(lrange_bounds(items.len(), start, end)
                .map(|(first, last)| items[first..=last].to_vec())
                .unwrap_or_default()),
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn flushdb(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();

        store.set("key1", b"value1".to_vec()).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();

        store.set("key1", b"value1".to_vec()).await.unwrap();
        store.set("key1", b"value2".to_vec()).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_setex_expires() {
        let store = MemoryStore::new();

        store.setex("key1", 1, b"value1".to_vec()).await.unwrap();
        assert!(store.get("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.get("key1").await.unwrap(), None);
        assert!(store.is_empty().await, "expired key should be dropped on access");
    }

    #[tokio::test]
    async fn test_setex_rejects_zero_ttl() {
        let store = MemoryStore::new();
        let result = store.setex("key1", 0, b"value".to_vec()).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_setex_with_huge_ttl_keeps_value() {
        let store = MemoryStore::new();

        store
            .setex("key1", u64::MAX / 1000 + 1, b"value".to_vec())
            .await
            .unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(b"value".to_vec()));
    }

    #[tokio::test]
    async fn test_set_clears_ttl() {
        let store = MemoryStore::new();

        store.setex("key1", 1, b"short".to_vec()).await.unwrap();
        store.set("key1", b"forever".to_vec()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.get("key1").await.unwrap(), Some(b"forever".to_vec()));
    }

    #[tokio::test]
    async fn test_incr_creates_and_counts() {
        let store = MemoryStore::new();

        assert_eq!(store.incr("hits").await.unwrap(), 1);
        assert_eq!(store.incr("hits").await.unwrap(), 2);
        assert_eq!(store.get("hits").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_incr_after_set_zero() {
        let store = MemoryStore::new();

        store.set("hits", b"0".to_vec()).await.unwrap();
        assert_eq!(store.incr("hits").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_incr_rejects_non_integer() {
        let store = MemoryStore::new();

        store.set("name", b"alice".to_vec()).await.unwrap();
        let result = store.incr("name").await;
        assert!(matches!(result, Err(CacheError::NotAnInteger(_))));
    }

    #[tokio::test]
    async fn test_incr_keeps_ttl() {
        let store = MemoryStore::new();

        store.setex("hits", 1, b"5".to_vec()).await.unwrap();
        assert_eq!(store.incr("hits").await.unwrap(), 6);

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.get("hits").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rpush_and_lrange() {
        let store = MemoryStore::new();

        assert_eq!(store.rpush("log", b"a".to_vec()).await.unwrap(), 1);
        assert_eq!(store.rpush("log", b"b".to_vec()).await.unwrap(), 2);
        assert_eq!(store.rpush("log", b"c".to_vec()).await.unwrap(), 3);

        let all = store.lrange("log", 0, -1).await.unwrap();
        assert_eq!(all, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);

        let tail = store.lrange("log", -2, -1).await.unwrap();
        assert_eq!(tail, vec![b"b".to_vec(), b"c".to_vec()]);
    }

    #[tokio::test]
    async fn test_lrange_missing_is_empty() {
        let store = MemoryStore::new();
        assert!(store.lrange("missing", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_type_errors() {
        let store = MemoryStore::new();

        store.set("scalar", b"1".to_vec()).await.unwrap();
        store.rpush("list", b"a".to_vec()).await.unwrap();

        assert!(matches!(
            store.rpush("scalar", b"x".to_vec()).await,
            Err(CacheError::WrongType(_))
        ));
        assert!(matches!(
            store.lrange("scalar", 0, -1).await,
            Err(CacheError::WrongType(_))
        ));
        assert!(matches!(store.get("list").await, Err(CacheError::WrongType(_))));
        assert!(matches!(store.incr("list").await, Err(CacheError::WrongType(_))));
    }

    #[tokio::test]
    async fn test_flushdb_clears_everything() {
        let store = MemoryStore::new();

        store.set("a", b"1".to_vec()).await.unwrap();
        store.rpush("b", b"2".to_vec()).await.unwrap();
        store.flushdb().await.unwrap();

        assert!(store.is_empty().await);
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = MemoryStore::new();

        store.setex("key1", 1, b"value1".to_vec()).await.unwrap();
        store.setex("key2", 10, b"value2".to_vec()).await.unwrap();
        store.set("key3", b"value3".to_vec()).await.unwrap();

        // Wait for key1 to expire
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let removed = store.cleanup_expired().await;
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 2);
        assert!(store.get("key2").await.unwrap().is_some());
    }
}
