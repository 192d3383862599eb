//! Instrumented Cache
//!
//! Stores values under generated keys through a logged, counted operation
//! chain, and reads back the counters and call logs it leaves behind.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CacheError, Result};
use crate::kv::KvStore;
use crate::tracking::operation::{inputs_key, outputs_key, Counted, Logged};
use crate::tracking::{CallHistory, Operation, OperationExt, Value};

/// Name under which `Cache::store` is counted and logged.
pub const STORE_OPERATION: &str = "store";

// == Store Value ==
/// Base operation behind `Cache::store`: writes a value under a fresh UUID.
struct StoreValue {
    store: Arc<dyn KvStore>,
}

#[async_trait]
impl Operation for StoreValue {
    type Input = (Value,);
    type Output = String;

    fn name(&self) -> &str {
        STORE_OPERATION
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let (value,) = input;
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, value.to_bytes()).await?;
        debug!(key = %key, "Stored value");
        Ok(key)
    }
}

// == Cache ==
/// Call-tracking cache over a key-value store.
pub struct Cache {
    store: Arc<dyn KvStore>,
    store_op: Logged<Counted<StoreValue>>,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache over `store` and flushes the store's database.
    pub async fn new(store: Arc<dyn KvStore>) -> Result<Self> {
        store.flushdb().await?;

        let store_op = StoreValue {
            store: store.clone(),
        }
        .counted(store.clone())
        .logged(store.clone());

        Ok(Self { store, store_op })
    }

    // == Store ==
    /// Stores `value` under a newly generated key and returns the key.
    ///
    /// NaN and infinities are rejected before the call is counted or logged;
    /// JSON has no encoding for them, so the call log could not hold them.
    pub async fn store(&self, value: impl Into<Value>) -> Result<String> {
        let value = value.into();
        if let Value::Float(f) = value {
            if !f.is_finite() {
                return Err(CacheError::InvalidValue(format!(
                    "cannot store non-finite float {}",
                    f
                )));
            }
        }
        self.store_op.call((value,)).await
    }

    // == Get ==
    /// Returns the raw bytes under `key`, or `None` if it was never written.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Returns the value under `key` passed through `transform`.
    ///
    /// The transform only runs when the key is present.
    pub async fn get_with<T, F>(&self, key: &str, transform: F) -> Result<Option<T>>
    where
        F: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.store.get(key).await?.map(transform).transpose()
    }

    /// Returns the value under `key` parsed as a base-10 integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |raw| {
            std::str::from_utf8(&raw)
                .ok()
                .and_then(|text| text.trim().parse::<i64>().ok())
                .ok_or_else(|| CacheError::InvalidValue(format!("'{}' is not an integer", key)))
        })
        .await
    }

    /// Returns the value under `key` decoded as UTF-8 text.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |raw| {
            String::from_utf8(raw)
                .map_err(|_| CacheError::InvalidValue(format!("'{}' is not valid UTF-8", key)))
        })
        .await
    }

    // == Call Count ==
    /// Returns how many times `operation` has been invoked.
    pub async fn call_count(&self, operation: &str) -> Result<i64> {
        Ok(self.get_int(operation).await?.unwrap_or(0))
    }

    // == History ==
    /// Reads both call logs of `operation`.
    pub async fn history(&self, operation: &str) -> Result<CallHistory> {
        let inputs = self.store.lrange(&inputs_key(operation), 0, -1).await?;
        let outputs = self.store.lrange(&outputs_key(operation), 0, -1).await?;

        let history = CallHistory {
            operation: operation.to_string(),
            inputs: inputs.iter().map(|raw| String::from_utf8_lossy(raw).into_owned()).collect(),
            outputs: outputs.iter().map(|raw| String::from_utf8_lossy(raw).into_owned()).collect(),
        };

        if history.is_diverged() {
            warn!(
                operation,
                inputs = history.inputs.len(),
                outputs = history.outputs.len(),
                "Call logs diverged; replaying paired entries only"
            );
        }

        Ok(history)
    }

    // == Replay ==
    /// Prints the call history of `operation` to stdout.
    pub async fn replay(&self, operation: &str) -> Result<()> {
        let history = self.history(operation).await?;
        print!("{}", history);
        Ok(())
    }
}
