use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use strukt_types::StructureId;

use crate::de;

/// Field type tag of a matrix field.
pub const MATRIX_TAG: &str = "matrix";

/// Field type tag given to the individual block definitions of a matrix.
pub const MATRIX_BLOCK_TAG: &str = "matrix_block";

/// Alias → type tag of a structure's top-level fields.
pub type FieldTags = BTreeMap<String, String>;

/// Describes a structure (content type): its metadata and its ordered field
/// definitions.
///
/// Schemas are fetched once from the content API and never mutated. Any
/// metadata not modelled explicitly is kept in `extra` and available through
/// [`Schema::meta`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(deserialize_with = "de::id")]
    pub id: u64,
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub published: bool,
    /// Field definitions in the order the API returned them.
    #[serde(default, deserialize_with = "de::definitions")]
    pub fields: Vec<FieldDefinition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schema {
    /// Builds a schema from the JSON body of a `structures/{id}/basic` response.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Shorthand for a schema with only an id, a name and fields.
    pub fn new(id: u64, name: &str, fields: Vec<FieldDefinition>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            published: true,
            fields,
            extra: Map::new(),
        }
    }

    /// Returns the typed structure id, if the schema carries a valid one.
    pub fn structure_id(&self) -> Option<StructureId> {
        (self.id > 0).then(|| StructureId::new(self.id))
    }

    /// Looks up a top-level field by alias.
    pub fn field(&self, alias: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.alias == alias)
    }

    /// Returns the alias → type tag map of the top-level fields.
    pub fn field_tags(&self) -> FieldTags {
        self.fields
            .iter()
            .filter(|f| !f.alias.is_empty())
            .map(|f| (f.alias.clone(), f.tag.clone()))
            .collect()
    }

    /// Returns a metadata attribute not modelled as a struct field
    /// (`value_name`, `image_field`, `hide_url`, `config`, ...).
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// A single field of a structure, or a block type of a matrix field.
///
/// For a `matrix` field, `blocks` lists its block types; each block's
/// `alias` is the discriminator stored in the `type` key of block instances,
/// and the block's own `fields` describe its contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(default, deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::text")]
    pub name: String,
    /// Attribute key on the wire.
    #[serde(default, deserialize_with = "de::text")]
    pub alias: String,
    /// Type tag selecting the codec.
    #[serde(rename = "type", default, deserialize_with = "de::text")]
    pub tag: String,
    #[serde(default, deserialize_with = "de::int")]
    pub sorting: i64,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub content_field: Option<String>,
    #[serde(default, deserialize_with = "de::int")]
    pub collection_id: i64,
    #[serde(default, deserialize_with = "de::definitions", skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDefinition>,
    #[serde(default, deserialize_with = "de::definitions", skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<FieldDefinition>,
}

impl FieldDefinition {
    /// Shorthand for a plain field.
    pub fn new(alias: &str, tag: &str) -> Self {
        Self {
            name: alias.into(),
            alias: alias.into(),
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Shorthand for a matrix field with the given block types.
    pub fn matrix(alias: &str, blocks: Vec<FieldDefinition>) -> Self {
        Self {
            blocks,
            ..Self::new(alias, MATRIX_TAG)
        }
    }

    /// Shorthand for a matrix block type with its fields.
    pub fn block(alias: &str, fields: Vec<FieldDefinition>) -> Self {
        Self {
            fields,
            ..Self::new(alias, MATRIX_BLOCK_TAG)
        }
    }

    /// Returns true if this is a matrix field.
    pub fn is_matrix(&self) -> bool {
        self.tag == MATRIX_TAG
    }

    /// The definitions one nesting level below this one: block types for a
    /// matrix, sub-fields for everything else.
    pub fn children(&self) -> &[FieldDefinition] {
        if self.is_matrix() {
            &self.blocks
        } else {
            &self.fields
        }
    }

    /// Looks up a block type of this matrix by its discriminator.
    pub fn block_type(&self, block_type: &str) -> Option<&FieldDefinition> {
        self.blocks.iter().find(|b| b.alias == block_type)
    }

    /// Looks up a sub-field by alias.
    pub fn field(&self, alias: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.alias == alias)
    }
}
