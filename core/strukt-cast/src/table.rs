use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use strukt_model::FieldValue;

use crate::codec::{AttributeCodec, FieldCodec};
use crate::context::CastContext;
use crate::tag::BUILTIN_TAGS;

/// Maps field type tags to codecs.
///
/// [`CodecTable::new`] registers every built-in tag including synonyms.
/// Tags without a codec pass values through unchanged in both directions.
#[derive(Clone)]
pub struct CodecTable {
    codecs: HashMap<String, Arc<dyn AttributeCodec>>,
}

impl CodecTable {
    /// A table with all built-in codecs.
    pub fn new() -> Self {
        let mut table = Self::empty();
        for (tag, field_tag) in BUILTIN_TAGS {
            table.register(*tag, FieldCodec::new(*field_tag));
        }
        table
    }

    /// A table with no codecs at all; every tag passes through.
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Registers `codec` for `tag`, returning the codec it replaced.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        codec: impl AttributeCodec + 'static,
    ) -> Option<Arc<dyn AttributeCodec>> {
        self.register_arc(tag, Arc::new(codec))
    }

    /// Registers an already shared codec for `tag`.
    pub fn register_arc(
        &mut self,
        tag: impl Into<String>,
        codec: Arc<dyn AttributeCodec>,
    ) -> Option<Arc<dyn AttributeCodec>> {
        self.codecs.insert(tag.into(), codec)
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<dyn AttributeCodec>> {
        self.codecs.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.codecs.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Decodes `raw` as a `tag` value.
    pub fn decode(&self, tag: &str, raw: &Value, ctx: &CastContext<'_>) -> FieldValue {
        match self.codecs.get(tag) {
            Some(codec) => codec.decode(raw, ctx),
            None => FieldValue::Raw(raw.clone()),
        }
    }

    /// Encodes `value` as a `tag` value.
    pub fn encode(&self, tag: &str, value: &FieldValue, ctx: &CastContext<'_>) -> Value {
        match self.codecs.get(tag) {
            Some(codec) => codec.encode(value, ctx),
            None => value.to_plain(),
        }
    }
}

impl Default for CodecTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CodecTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecTable")
            .field("tags", &self.tags())
            .finish()
    }
}
