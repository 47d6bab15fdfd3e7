use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strukt_types::{EntryId, StructureId};

/// Attribute linking an entry to its structure.
pub const STRUCTURE_KEY: &str = "directory_id";

/// A structure entry as returned by the content API.
///
/// All attributes are kept in wire form. Decoding happens on read through
/// the casting layer; nothing here interprets field types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    attributes: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an attribute map.
    pub fn from_map(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// Wraps a JSON value. Anything but an object yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(attributes) => Some(Self { attributes }),
            _ => None,
        }
    }

    /// Creates an empty record belonging to a structure.
    pub fn for_structure(structure_id: StructureId) -> Self {
        let mut record = Self::new();
        record.set_raw(STRUCTURE_KEY, Value::from(structure_id.get()));
        record
    }

    /// Returns a raw attribute.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Sets a raw attribute.
    pub fn set_raw(&mut self, key: impl Into<String>, value: Value) {
        self.attributes.insert(key.into(), value);
    }

    /// Removes a raw attribute, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    /// The entry id, if the record has been persisted.
    pub fn id(&self) -> Option<EntryId> {
        self.raw("id").and_then(EntryId::from_value)
    }

    /// The structure this entry belongs to.
    pub fn structure_id(&self) -> Option<StructureId> {
        self.raw(STRUCTURE_KEY).and_then(StructureId::from_value)
    }

    /// The entry's (unlocalized) name.
    pub fn name(&self) -> Option<&str> {
        self.raw("name").and_then(Value::as_str)
    }

    /// Extract a string value using a JSON pointer (e.g., "/seo/title").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.pointer(pointer).and_then(Value::as_str)
    }

    /// Extract any raw value using a JSON pointer.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let (head, rest) = match pointer.strip_prefix('/') {
            Some(path) => path.split_once('/').unwrap_or((path, "")),
            None => return None,
        };
        let value = self.attributes.get(head)?;
        if rest.is_empty() {
            Some(value)
        } else {
            value.pointer(&format!("/{rest}"))
        }
    }

    /// Returns a copy prepared for a bulk import into `structure_id`: the
    /// structure id is set, the revision is published, and entries with
    /// neither a name nor an id get a generated unique name.
    pub fn prepared_for_import(&self, structure_id: StructureId) -> Self {
        let mut record = self.clone();
        record.set_raw(STRUCTURE_KEY, Value::from(structure_id.get()));
        record.set_raw("revision_publish", Value::Bool(true));
        if !record.contains("name") && !record.contains("id") {
            record.set_raw("name", Value::from(uuid::Uuid::new_v4().to_string()));
        }
        record
    }
}

impl From<Map<String, Value>> for Record {
    fn from(attributes: Map<String, Value>) -> Self {
        Self::from_map(attributes)
    }
}
