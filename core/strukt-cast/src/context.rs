use serde_json::Value;
use strukt_model::{FieldDefinition, FieldValue, Schema};

use crate::matrix::MatrixResolver;
use crate::path::SchemaPath;
use crate::table::CodecTable;

/// Everything a codec may consult besides the value itself: the codec table
/// (for nested fields), the owning record's schema and the position of the
/// value within that schema.
///
/// Contexts are cheap to derive; [`CastContext::child`] returns a new context
/// one level deeper and leaves `self` untouched.
#[derive(Debug, Clone)]
pub struct CastContext<'a> {
    codecs: &'a CodecTable,
    schema: Option<&'a Schema>,
    path: SchemaPath,
}

impl<'a> CastContext<'a> {
    /// A context with no schema, positioned at the root.
    pub fn new(codecs: &'a CodecTable) -> Self {
        Self {
            codecs,
            schema: None,
            path: SchemaPath::root(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: Option<&'a Schema>) -> Self {
        self.schema = schema;
        self
    }

    /// Returns a context positioned at `path`.
    #[must_use]
    pub fn at(&self, path: SchemaPath) -> Self {
        Self {
            codecs: self.codecs,
            schema: self.schema,
            path,
        }
    }

    /// Returns a context one segment deeper.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        self.at(self.path.child(segment))
    }

    pub fn codecs(&self) -> &'a CodecTable {
        self.codecs
    }

    pub fn schema(&self) -> Option<&'a Schema> {
        self.schema
    }

    pub fn path(&self) -> &SchemaPath {
        &self.path
    }

    /// The field definition at the current path, if the schema has one.
    pub fn definition(&self) -> Option<&'a FieldDefinition> {
        MatrixResolver::new(self.schema?).resolve(&self.path)
    }

    /// Decodes `raw` with the codec registered for `tag`.
    pub fn decode(&self, tag: &str, raw: &Value) -> FieldValue {
        self.codecs.decode(tag, raw, self)
    }

    /// Encodes `value` with the codec registered for `tag`.
    pub fn encode(&self, tag: &str, value: &FieldValue) -> Value {
        self.codecs.encode(tag, value, self)
    }
}
