//! Rich-text field values: block-editor documents and HTML strings.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// One block of a block-editor document (`paragraph`, `header`, `list`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub block_type: String,
    #[serde(default)]
    pub data: Value,
}

/// The decoded value of an `editor-blocks` field.
///
/// The document (`time`, `version`, `blocks`, ...) is kept in its raw form;
/// typed accessors read from it on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorBlocks {
    raw: Value,
}

impl EditorBlocks {
    /// Wraps a raw wire value. JSON strings are parsed; anything that is not
    /// an object becomes an empty document.
    pub fn parse(raw: &Value) -> Self {
        let parsed = match raw {
            Value::String(s) => serde_json::from_str(s).unwrap_or(Value::Null),
            other => other.clone(),
        };
        let raw = match parsed {
            Value::Object(map) => Value::Object(map),
            _ => Value::Null,
        };
        Self { raw }
    }

    /// The document as stored.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// True when the document has no content at all.
    pub fn is_empty(&self) -> bool {
        self.raw.as_object().is_none_or(|m| m.is_empty())
    }

    /// Editor timestamp (milliseconds).
    pub fn time(&self) -> Option<i64> {
        self.raw.get("time").and_then(Value::as_i64)
    }

    /// Editor version that produced the document.
    pub fn version(&self) -> Option<&str> {
        self.raw.get("version").and_then(Value::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.raw.get("author").and_then(Value::as_str)
    }

    /// The document's blocks. Malformed entries are skipped.
    pub fn blocks(&self) -> Vec<EditorBlock> {
        self.raw
            .get("blocks")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|b| serde_json::from_value(b.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The form written back to the API: the document, or `null` if empty.
    pub fn to_raw(&self) -> Value {
        if self.is_empty() {
            Value::Null
        } else {
            self.raw.clone()
        }
    }
}

impl Serialize for EditorBlocks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

/// Trusted HTML produced by the `editor-small` and `editor-large` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HtmlString(String);

impl HtmlString {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for HtmlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
