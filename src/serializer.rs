//! Serialization layer: snapshot map to bytes and back, via serde_json.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Pick compact or pretty from a flag.
    pub fn with_pretty(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Whether output is indented.
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Encode a snapshot to bytes.
    pub fn serialize(&self, data: &Map<String, Value>) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(data)
        } else {
            serde_json::to_vec(data)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    /// Decode file contents. Anything other than a JSON object is corrupt
    /// state; empty input is an empty map.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Map<String, Value>> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::CorruptState(format!(
                "expected a JSON object, found {}",
                kind(&other)
            ))),
            Err(e) => Err(Error::CorruptState(e.to_string())),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
