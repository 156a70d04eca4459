//! Run-scoped shared state.

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use super::error::EngineError;

/// Key-value store shared by every step invocation in a single run.
///
/// Values are stored as JSON so callers can write and read any serde type.
/// The map is sharded, so writes to distinct keys from concurrent
/// invocations never interfere. Last-writer-wins on the same key; steps
/// that share a key are expected to coordinate through the event flow.
///
/// The store lives exactly as long as the run and is dropped with it.
#[derive(Debug)]
pub struct RunContext {
    run_id: Uuid,
    values: DashMap<String, Value>,
}

impl RunContext {
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            values: DashMap::new(),
        }
    }

    /// The run this store belongs to.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Serialize `value` under `key`, replacing any previous value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), EngineError> {
        let encoded = serde_json::to_value(value).map_err(|err| EngineError::ContextCodec {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        self.values.insert(key.to_string(), encoded);
        Ok(())
    }

    /// Read and deserialize the value under `key`, if present.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, EngineError> {
        let Some(entry) = self.values.get(key) else {
            return Ok(None);
        };
        let decoded =
            serde_json::from_value(entry.value().clone()).map_err(|err| EngineError::ContextCodec {
                key: key.to_string(),
                message: err.to_string(),
            })?;
        Ok(Some(decoded))
    }

    /// Read the value under `key`, failing the caller if it was never set.
    pub fn get_required<T: DeserializeOwned>(&self, key: &str) -> Result<T, EngineError> {
        self.get(key)?.ok_or_else(|| EngineError::ContextMissing {
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
