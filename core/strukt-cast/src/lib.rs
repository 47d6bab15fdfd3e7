//! Attribute casting for structure entries.
//!
//! A structure's schema assigns each attribute a type tag. This crate turns
//! raw wire values into [`FieldValue`](strukt_model::FieldValue)s according to
//! that tag and back again:
//! - [`FieldTag`] / [`FieldCodec`]: the built-in tag behaviors
//! - [`CodecTable`]: tag → codec table, open to custom [`AttributeCodec`]s
//! - [`CastContext`] / [`SchemaPath`] / [`MatrixResolver`]: where a value sits
//!   in its schema, for matrix fields and their blocks
//! - [`LocalizedAttributeResolver`]: locale-suffixed attribute reads
//!
//! Casting never fails. Malformed values coerce to defaults and values
//! without a usable schema pass through unchanged.

mod codec;
mod context;
mod localized;
mod matrix;
mod path;
mod table;
mod tag;

pub use codec::{AttributeCodec, FieldCodec};
pub use context::CastContext;
pub use localized::{
    candidate_keys, LocalizedAttributeResolver, LocalizedItem, LocalizedValue, LocalizedView,
    DEFAULT_RESERVED_KEYS,
};
pub use matrix::MatrixResolver;
pub use path::SchemaPath;
pub use table::CodecTable;
pub use tag::{FieldTag, BUILTIN_TAGS};

use serde_json::Value;
use strukt_model::FieldValue;

/// Decodes `raw` as a top-level `tag` value with the built-in codecs and no
/// schema. Container tags pass through.
pub fn decode(tag: &str, raw: &Value) -> FieldValue {
    let codecs = CodecTable::new();
    CastContext::new(&codecs).decode(tag, raw)
}

/// Encodes `value` as a top-level `tag` value with the built-in codecs and
/// no schema.
pub fn encode(tag: &str, value: &FieldValue) -> Value {
    let codecs = CodecTable::new();
    CastContext::new(&codecs).encode(tag, value)
}
