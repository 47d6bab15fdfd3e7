//! Lenient serde adapters for schema documents.
//!
//! Schema JSON comes straight from the content API, where integers may be
//! strings, booleans may be `"0"`/`"1"`, and nested lists may be `null` or
//! keyed objects. Every adapter here goes through `serde_json::Value` and
//! coerces instead of failing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::coerce;
use crate::schema::FieldDefinition;

pub(crate) fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce::to_int(&value))
}

pub(crate) fn id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(u64::try_from(coerce::to_int(&value)).unwrap_or(0))
}

pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce::to_bool(&value))
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce::to_text(&value))
}

pub(crate) fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(coerce::to_text(&other)),
    })
}

/// Reads a list of field definitions. Accepts arrays (order kept) and keyed
/// objects; entries that are not objects are skipped.
pub(crate) fn definitions<'de, D>(deserializer: D) -> Result<Vec<FieldDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items: Vec<Value> = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => Vec::new(),
    };

    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
