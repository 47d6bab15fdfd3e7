//! Free-form JSON field values.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// The decoded value of a `json` field.
///
/// Keeps the value exactly as parsed (`raw`) next to the normalized
/// attributes used for reads. A field that held no parseable JSON decodes to
/// an empty object with a `null` raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonField {
    original: Value,
    attributes: Value,
}

impl JsonField {
    /// Wraps an already-parsed value.
    pub fn new(original: Value) -> Self {
        let attributes = match &original {
            Value::Null => Value::Object(Map::new()),
            other => other.clone(),
        };
        Self {
            original,
            attributes,
        }
    }

    /// Parses a raw wire value: strings are parsed as JSON, structured values
    /// are taken as-is, and anything unparseable becomes an empty value.
    pub fn parse(raw: &Value) -> Self {
        match raw {
            Value::String(s) => Self::new(serde_json::from_str(s).unwrap_or(Value::Null)),
            Value::Array(_) | Value::Object(_) => Self::new(raw.clone()),
            _ => Self::new(Value::Null),
        }
    }

    /// The value as originally decoded.
    pub fn raw(&self) -> &Value {
        &self.original
    }

    /// The normalized value.
    pub fn value(&self) -> &Value {
        &self.attributes
    }

    /// Looks up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Looks up a nested value by JSON pointer (e.g. `/meta/title`).
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.attributes.pointer(pointer)
    }

    /// Serializes the normalized value back to a JSON string.
    pub fn to_json_string(&self) -> String {
        self.attributes.to_string()
    }
}

impl Serialize for JsonField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}
