//! Typed (decoded) field values.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::editor::{EditorBlocks, HtmlString};
use crate::json::JsonField;
use crate::media::{File, Image};
use crate::rule::DateRule;

/// Wire format of `date` values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format of `datetime` values.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Key carrying the block discriminator inside a matrix block.
pub const BLOCK_TYPE_KEY: &str = "type";

/// One element of a `multiselect` value. Numeric tokens become numbers;
/// everything else stays text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl OptionValue {
    fn to_plain(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }
}

/// A decoded matrix block: its discriminator plus its decoded fields in
/// schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    block_type: String,
    fields: Vec<(String, FieldValue)>,
}

impl Block {
    pub fn new(block_type: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field insertion.
    #[must_use]
    pub fn with(mut self, alias: impl Into<String>, value: FieldValue) -> Self {
        self.insert(alias, value);
        self
    }

    /// Sets a field, replacing an existing value with the same alias.
    pub fn insert(&mut self, alias: impl Into<String>, value: FieldValue) {
        let alias = alias.into();
        match self.fields.iter_mut().find(|(a, _)| *a == alias) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((alias, value)),
        }
    }

    /// The block discriminator.
    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    pub fn get(&self, alias: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(a, _)| a == alias).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(a, v)| (a.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Flattens the block to a JSON object with the discriminator merged in.
    pub fn to_plain(&self) -> Value {
        let mut map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(alias, value)| (alias.clone(), value.to_plain()))
            .collect();
        map.insert(BLOCK_TYPE_KEY.to_string(), Value::from(self.block_type.as_str()));
        Value::Object(map)
    }
}

/// A decoded field value.
///
/// `Raw` carries values that were passed through untouched: unknown tags,
/// unresolvable matrix branches and anything the caller supplies in wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Html(HtmlString),
    Tags(Vec<String>),
    Ids(Vec<i64>),
    Options(Vec<OptionValue>),
    Json(JsonField),
    Rule(DateRule),
    EditorBlocks(EditorBlocks),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    File(File),
    Image(Image),
    Matrix(Vec<FieldValue>),
    Block(Block),
    Raw(Value),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Raw(Value::Null))
    }

    /// True for values that are rich objects in their own right (files,
    /// images, JSON, rules, editor documents, HTML). These are kept intact
    /// when nested inside matrix blocks.
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            Self::Html(_)
                | Self::Json(_)
                | Self::Rule(_)
                | Self::EditorBlocks(_)
                | Self::File(_)
                | Self::Image(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Html(h) => Some(h.as_str()),
            Self::Raw(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            Self::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            Self::Date(d) => d.and_hms_opt(0, 0, 0),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Self::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&[FieldValue]> {
        match self {
            Self::Matrix(items) => Some(items),
            _ => None,
        }
    }

    /// Projects the value to plain JSON, the form used when an entry is
    /// rendered as an array or serialized for output.
    pub fn to_plain(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Text(s) => Value::from(s.as_str()),
            Self::Html(h) => Value::from(h.as_str()),
            Self::Tags(tags) => Value::from(tags.clone()),
            Self::Ids(ids) => Value::from(ids.clone()),
            Self::Options(items) => Value::Array(items.iter().map(OptionValue::to_plain).collect()),
            Self::Json(json) => json.value().clone(),
            Self::Rule(rule) => serde_json::to_value(rule).unwrap_or(Value::Null),
            Self::EditorBlocks(doc) => doc.to_raw(),
            Self::Date(d) => Value::from(d.format(DATE_FORMAT).to_string()),
            Self::DateTime(dt) => Value::from(dt.format(DATETIME_FORMAT).to_string()),
            Self::File(file) => Value::Object(file.raw().clone()),
            Self::Image(image) => Value::Object(image.as_file().raw().clone()),
            Self::Matrix(items) => Value::Array(items.iter().map(FieldValue::to_plain).collect()),
            Self::Block(block) => block.to_plain(),
            Self::Raw(value) => value.clone(),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<Block> for FieldValue {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
