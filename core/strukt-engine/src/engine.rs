use std::sync::Arc;

use serde_json::{Map, Value};
use strukt_cast::{
    AttributeCodec, CastContext, CodecTable, LocalizedAttributeResolver, LocalizedValue,
    SchemaPath,
};
use strukt_model::{defaults, FieldTags, FieldValue, Record, Schema};
use strukt_types::{Locale, StructureId};
use tracing::debug;

use crate::cache::Cache;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::{EntryModel, RecordTypeRegistry, TypedEntry};
use crate::schemas::SchemaRegistry;
use crate::transport::Transport;

/// Reads and writes entry attributes according to their structure's schema.
///
/// Owns the codec table, the schema registry, the record type registry and
/// the locale resolver. Build one per API connection with
/// [`StructureEngine::builder`] and share it behind an `Arc`.
#[derive(Debug)]
pub struct StructureEngine {
    codecs: CodecTable,
    schemas: SchemaRegistry,
    models: RecordTypeRegistry,
    localizer: LocalizedAttributeResolver,
}

impl StructureEngine {
    pub fn builder() -> StructureEngineBuilder {
        StructureEngineBuilder::default()
    }

    pub fn codecs(&self) -> &CodecTable {
        &self.codecs
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn models(&self) -> &RecordTypeRegistry {
        &self.models
    }

    pub fn localizer(&self) -> &LocalizedAttributeResolver {
        &self.localizer
    }

    // ── Registries ───────────────────────────────────────────────

    /// The schema of structure `id`, fetched on first use.
    pub fn schema(&self, id: StructureId) -> Option<Arc<Schema>> {
        self.schemas.retrieve(id)
    }

    /// The alias → tag map of structure `id`.
    pub fn field_tags(&self, id: StructureId) -> Option<Arc<FieldTags>> {
        self.schemas.field_tags(id)
    }

    /// The record type representing structure `id`.
    pub fn resolve_record_type(&self, id: StructureId) -> Arc<dyn EntryModel> {
        self.models.resolve(id)
    }

    /// Pairs an entry with its record type.
    pub fn materialize(&self, record: &Record) -> TypedEntry {
        self.models.materialize(record)
    }

    // ── Attribute casting ────────────────────────────────────────

    /// The tag governing `key` on entries of `structure_id`: a record type
    /// override, then the schema, then the platform defaults.
    pub fn tag_for(&self, structure_id: Option<StructureId>, key: &str) -> Option<String> {
        let schema = structure_id.and_then(|id| self.schema(id));
        let model = structure_id.map(|id| self.models.resolve(id));
        Self::tag_in(model.as_deref(), schema.as_deref(), key)
    }

    fn tag_in(model: Option<&dyn EntryModel>, schema: Option<&Schema>, key: &str) -> Option<String> {
        if let Some((_, tag)) = model
            .and_then(|m| m.cast_overrides().iter().find(|(alias, _)| *alias == key))
        {
            return Some((*tag).to_string());
        }
        if let Some(field) = schema.and_then(|s| s.field(key)) {
            return Some(field.tag.clone());
        }
        defaults::default_field_tag(key).map(str::to_string)
    }

    /// Decodes the raw value of attribute `key` of an entry of
    /// `structure_id`. Attributes without a known tag pass through.
    pub fn decode_attribute(
        &self,
        structure_id: Option<StructureId>,
        key: &str,
        raw: &Value,
    ) -> FieldValue {
        let schema = structure_id.and_then(|id| self.schema(id));
        let model = structure_id.map(|id| self.models.resolve(id));
        self.decode_in(model.as_deref(), schema.as_deref(), key, raw)
    }

    /// Encodes a typed value of attribute `key` for the wire.
    pub fn encode_attribute(
        &self,
        structure_id: Option<StructureId>,
        key: &str,
        value: &FieldValue,
    ) -> Value {
        let schema = structure_id.and_then(|id| self.schema(id));
        let model = structure_id.map(|id| self.models.resolve(id));
        match Self::tag_in(model.as_deref(), schema.as_deref(), key) {
            Some(tag) => self.context(schema.as_deref(), key).encode(&tag, value),
            None => value.to_plain(),
        }
    }

    fn decode_in(
        &self,
        model: Option<&dyn EntryModel>,
        schema: Option<&Schema>,
        key: &str,
        raw: &Value,
    ) -> FieldValue {
        match Self::tag_in(model, schema, key) {
            Some(tag) => self.context(schema, key).decode(&tag, raw),
            None => FieldValue::Raw(raw.clone()),
        }
    }

    fn context<'a>(&'a self, schema: Option<&'a Schema>, key: &str) -> CastContext<'a> {
        CastContext::new(&self.codecs)
            .with_schema(schema)
            .at(SchemaPath::field(key))
    }

    // ── Entries ──────────────────────────────────────────────────

    /// Reads `key` from an entry through the locale chain, without decoding.
    pub fn resolve_localized_raw<'a>(&self, record: &'a Record, key: &str) -> LocalizedValue<'a> {
        self.localizer.resolve_record(record, key)
    }

    /// Like [`resolve_localized_raw`](Self::resolve_localized_raw) with a
    /// forced locale.
    pub fn resolve_localized_raw_in<'a>(
        &self,
        record: &'a Record,
        key: &str,
        locale: Locale,
    ) -> LocalizedValue<'a> {
        self.localizer.forced(locale).resolve_record(record, key)
    }

    /// Reads and decodes attribute `key` of an entry.
    pub fn get_attribute(&self, record: &Record, key: &str) -> FieldValue {
        let raw = self.resolve_localized_raw(record, key).to_value();
        self.decode_attribute(record.structure_id(), key, &raw)
    }

    /// Encodes `value` and stores it as attribute `key` of an entry.
    pub fn set_attribute(&self, record: &mut Record, key: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        let encoded = self.encode_attribute(record.structure_id(), key, &value);
        debug!("Setting {} on entry {:?}", key, record.id());
        record.set_raw(key, encoded);
    }

    /// Decodes every attribute of an entry into plain JSON, leaving out the
    /// fields its record type hides.
    pub fn to_visible_map(&self, record: &Record) -> Map<String, Value> {
        let model = self.models.resolve_for(record);
        let schema = record.structure_id().and_then(|id| self.schema(id));
        let overrides = record.structure_id().map(|_| model.as_ref());
        let hidden = model.hidden_fields();
        record
            .attributes()
            .iter()
            .filter(|(key, _)| !hidden.contains(&key.as_str()))
            .map(|(key, raw)| {
                let value = self.decode_in(overrides, schema.as_deref(), key, raw);
                (key.clone(), value.to_plain())
            })
            .collect()
    }
}

/// Assembles a [`StructureEngine`].
#[derive(Default)]
pub struct StructureEngineBuilder {
    transport: Option<Arc<dyn Transport>>,
    config: EngineConfig,
    codecs: Option<CodecTable>,
    custom_codecs: Vec<(String, Arc<dyn AttributeCodec>)>,
    schema_cache: Option<Arc<dyn Cache<Arc<Schema>>>>,
    field_tag_cache: Option<Arc<dyn Cache<Arc<FieldTags>>>>,
    models: Vec<Arc<dyn EntryModel>>,
}

impl StructureEngineBuilder {
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts from `codecs` instead of the built-in table.
    #[must_use]
    pub fn codecs(mut self, codecs: CodecTable) -> Self {
        self.codecs = Some(codecs);
        self
    }

    /// Registers a codec for a custom tag.
    #[must_use]
    pub fn codec(mut self, tag: impl Into<String>, codec: impl AttributeCodec + 'static) -> Self {
        self.custom_codecs.push((tag.into(), Arc::new(codec)));
        self
    }

    #[must_use]
    pub fn schema_cache(mut self, cache: Arc<dyn Cache<Arc<Schema>>>) -> Self {
        self.schema_cache = Some(cache);
        self
    }

    #[must_use]
    pub fn field_tag_cache(mut self, cache: Arc<dyn Cache<Arc<FieldTags>>>) -> Self {
        self.field_tag_cache = Some(cache);
        self
    }

    /// Registers a record type under the structure it declares.
    #[must_use]
    pub fn model(mut self, model: Arc<dyn EntryModel>) -> Self {
        self.models.push(model);
        self
    }

    /// Builds the engine. Record type registration errors propagate.
    pub fn build(self) -> Result<StructureEngine, EngineError> {
        let transport = self.transport.ok_or(EngineError::MissingTransport)?;

        let mut codecs = self.codecs.unwrap_or_default();
        for (tag, codec) in self.custom_codecs {
            codecs.register_arc(tag, codec);
        }

        let mut schemas = SchemaRegistry::new(transport).with_connection(self.config.connection.clone());
        if let Some(cache) = self.schema_cache {
            schemas = schemas.with_schema_cache(cache);
        }
        if let Some(cache) = self.field_tag_cache {
            schemas = schemas.with_field_tag_cache(cache);
        }

        let models = RecordTypeRegistry::new(self.config.registration_policy);
        for model in self.models {
            models.register_model(model)?;
        }

        let localizer = LocalizedAttributeResolver::new(self.config.locale_config())
            .with_reserved_keys(self.config.reserved_keys.iter().cloned());

        Ok(StructureEngine {
            codecs,
            schemas,
            models,
            localizer,
        })
    }
}
