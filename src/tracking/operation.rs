//! Operation Adapters
//!
//! Call counting and call logging as adapters around a base operation. Each
//! adapter implements [`Operation`] itself, so they stack:
//! `base.counted(store).logged(store)` counts innermost and logs outermost.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::kv::KvStore;

// == Key Helpers ==
/// List key holding serialized inputs for `operation`.
pub fn inputs_key(operation: &str) -> String {
    format!("{}:inputs", operation)
}

/// List key holding serialized outputs for `operation`.
pub fn outputs_key(operation: &str) -> String {
    format!("{}:outputs", operation)
}

// == Operation Trait ==
/// A named asynchronous operation.
///
/// `Input` is the positional argument tuple; it is what the call log records.
#[async_trait]
pub trait Operation: Send + Sync {
    type Input: Serialize + Send + 'static;
    type Output: Serialize + Send + 'static;

    /// Name used for the counter key and the call-log keys.
    fn name(&self) -> &str;

    async fn call(&self, input: Self::Input) -> Result<Self::Output>;
}

/// Builder helpers for stacking adapters.
pub trait OperationExt: Operation + Sized {
    /// Wraps the operation in a call counter.
    fn counted(self, store: Arc<dyn KvStore>) -> Counted<Self> {
        Counted { inner: self, store }
    }

    /// Wraps the operation in an input/output logger.
    fn logged(self, store: Arc<dyn KvStore>) -> Logged<Self> {
        Logged { inner: self, store }
    }
}

impl<O: Operation + Sized> OperationExt for O {}

// == Counted ==
/// Increments the counter at `<name>` before every call to the inner operation.
pub struct Counted<O> {
    inner: O,
    store: Arc<dyn KvStore>,
}

#[async_trait]
impl<O: Operation> Operation for Counted<O> {
    type Input = O::Input;
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        self.store.incr(self.name()).await?;
        self.inner.call(input).await
    }
}

// == Logged ==
/// Appends the call's inputs to `<name>:inputs` before the inner operation
/// runs, and its result to `<name>:outputs` once it returns.
///
/// A failed inner call leaves its input entry without a matching output.
pub struct Logged<O> {
    inner: O,
    store: Arc<dyn KvStore>,
}

#[async_trait]
impl<O: Operation> Operation for Logged<O> {
    type Input = O::Input;
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let encoded = serde_json::to_vec(&input)?;
        self.store.rpush(&inputs_key(self.name()), encoded).await?;

        let output = self.inner.call(input).await?;

        self.store
            .rpush(&outputs_key(self.name()), encode_output(&output)?)
            .await?;
        Ok(output)
    }
}

/// Strings are logged verbatim so a returned key reads back unchanged;
/// everything else is logged as JSON.
fn encode_output<T: Serialize>(output: &T) -> Result<Vec<u8>> {
    Ok(match serde_json::to_value(output)? {
        serde_json::Value::String(text) => text.into_bytes(),
        other => other.to_string().into_bytes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::kv::MemoryStore;
    use std::sync::Mutex;

    /// Store wrapper that records which commands reach the backend, in order.
    struct RecordingStore {
        inner: MemoryStore,
        commands: Mutex<Vec<String>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                commands: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, command: &str, key: &str) {
            self.commands
                .lock()
                .unwrap()
                .push(format!("{} {}", command, key));
        }

        fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl KvStore for RecordingStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.record("GET", key);
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
            self.record("SET", key);
            self.inner.set(key, value).await
        }

        async fn setex(&self, key: &str, ttl_seconds: u64, value: Vec<u8>) -> Result<()> {
            self.record("SETEX", key);
            self.inner.setex(key, ttl_seconds, value).await
        }

        async fn incr(&self, key: &str) -> Result<i64> {
            self.record("INCR", key);
            self.inner.incr(key).await
        }

        async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
            self.record("RPUSH", key);
            self.inner.rpush(key, value).await
        }

        async fn lrange(&self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>> {
            self.inner.lrange(key, start, end).await
        }

        async fn flushdb(&self) -> Result<()> {
            self.inner.flushdb().await
        }
    }

    /// Writes its argument under a fixed key and echoes the key back.
    struct Put {
        store: Arc<dyn KvStore>,
    }

    #[async_trait]
    impl Operation for Put {
        type Input = (String,);
        type Output = String;

        fn name(&self) -> &str {
            "put"
        }

        async fn call(&self, input: Self::Input) -> Result<Self::Output> {
            let (value,) = input;
            self.store.set("slot", value.into_bytes()).await?;
            Ok("slot".to_string())
        }
    }

    /// Always fails without touching the store.
    struct Broken;

    #[async_trait]
    impl Operation for Broken {
        type Input = (i64, i64);
        type Output = i64;

        fn name(&self) -> &str {
            "broken"
        }

        async fn call(&self, _input: Self::Input) -> Result<Self::Output> {
            Err(CacheError::Internal("boom".to_string()))
        }
    }

    #[tokio::test]
    async fn test_logging_wraps_counting() {
        let recorder = Arc::new(RecordingStore::new());
        let store: Arc<dyn KvStore> = recorder.clone();
        let op = Put {
            store: store.clone(),
        }
        .counted(store.clone())
        .logged(store.clone());

        let key = op.call(("hello".to_string(),)).await.unwrap();

        assert_eq!(key, "slot");
        assert_eq!(
            recorder.commands(),
            vec![
                "RPUSH put:inputs".to_string(),
                "INCR put".to_string(),
                "SET slot".to_string(),
                "RPUSH put:outputs".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_logged_records_inputs_and_outputs() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let op = Put {
            store: store.clone(),
        }
        .counted(store.clone())
        .logged(store.clone());

        op.call(("a".to_string(),)).await.unwrap();
        op.call(("b".to_string(),)).await.unwrap();

        let inputs = store.lrange("put:inputs", 0, -1).await.unwrap();
        let outputs = store.lrange("put:outputs", 0, -1).await.unwrap();
        assert_eq!(inputs, vec![br#"["a"]"#.to_vec(), br#"["b"]"#.to_vec()]);
        assert_eq!(outputs, vec![b"slot".to_vec(), b"slot".to_vec()]);
        assert_eq!(store.get("put").await.unwrap(), Some(b"2".to_vec()));
    }

    #[tokio::test]
    async fn test_failed_call_keeps_input_and_count() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let op = Broken.counted(store.clone()).logged(store.clone());

        let result = op.call((1, 2)).await;

        assert!(matches!(result, Err(CacheError::Internal(_))));
        assert_eq!(store.get("broken").await.unwrap(), Some(b"1".to_vec()));
        assert_eq!(
            store.lrange("broken:inputs", 0, -1).await.unwrap(),
            vec![b"[1,2]".to_vec()]
        );
        assert!(store.lrange("broken:outputs", 0, -1).await.unwrap().is_empty());
    }

    #[test]
    fn test_encode_output() {
        assert_eq!(encode_output(&"abc").unwrap(), b"abc");
        assert_eq!(encode_output(&42).unwrap(), b"42");
        assert_eq!(encode_output(&vec![1, 2]).unwrap(), b"[1,2]");
    }
}
