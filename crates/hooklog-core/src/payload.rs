//! Loosely-typed hook payloads as received from the host.

use std::io::Read;

use serde_json::{Map, Value};
use thiserror::Error;

/// The payload could not be decoded at the transport level.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}

/// One hook payload: an arbitrary JSON object.
///
/// Accessors never fail. A field that is missing or holds the wrong JSON
/// type reads as absent, and callers apply their own defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookPayload(Map<String, Value>);

impl HookPayload {
    /// Parses a payload from a JSON string.
    pub fn from_json(input: &str) -> Result<Self, DecodeError> {
        Self::from_value(serde_json::from_str(input)?)
    }

    /// Parses a payload from a reader (the host's stdin).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DecodeError> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(DecodeError::NotAnObject { found: "null" }),
            Value::Bool(_) => Err(DecodeError::NotAnObject { found: "a boolean" }),
            Value::Number(_) => Err(DecodeError::NotAnObject { found: "a number" }),
            Value::String(_) => Err(DecodeError::NotAnObject { found: "a string" }),
            Value::Array(_) => Err(DecodeError::NotAnObject { found: "an array" }),
        }
    }

    /// The raw `hook_event_name`, if present.
    pub fn hook_event_name(&self) -> Option<&str> {
        self.str_field("hook_event_name")
    }

    /// A string field, or `None` if missing or not a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// A boolean field, or `None` if missing or not a boolean.
    pub fn bool_field(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }
}

impl From<Map<String, Value>> for HookPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
