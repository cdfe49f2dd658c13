//! The generic payload unit exchanged with the PTZ service.
//!
//! A `Message` is a mapping of string keys to primitive values
//! (numbers, strings, booleans, nested mappings/sequences). On the
//! wire it is the UTF-8 bytes of its JSON encoding; the backing map is
//! BTree-ordered, so encoding is deterministic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PtzError;

/// A key/value message exchanged over a [`MessageChannel`].
///
/// [`MessageChannel`]: crate::channel::MessageChannel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(Map<String, Value>);

impl Message {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Serialize to the deterministic textual wire encoding.
    pub fn encode(&self) -> Vec<u8> {
        // A map of JSON values cannot fail to serialize.
        serde_json::to_vec(&self.0).unwrap_or_default()
    }

    /// Parse wire bytes back into a message.
    ///
    /// Fails with [`PtzError::Decode`] when the bytes are not valid
    /// UTF-8 JSON or the top level is not a mapping.
    pub fn decode(bytes: &[u8]) -> Result<Self, PtzError> {
        let value: Value = serde_json::from_slice(bytes)?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(PtzError::Decode(format!(
                "expected a mapping, got {other}"
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Numeric lookup, used by the handshake version check.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Message {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
