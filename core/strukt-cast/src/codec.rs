//! Field codecs: decoding raw wire values into [`FieldValue`]s and encoding
//! them back.
//!
//! Every function here is total. Malformed input coerces to a safe default
//! (`0`, `null`, an empty list) and container values whose schema cannot be
//! resolved pass through unchanged.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex_lite::Regex;
use serde_json::{Map, Value};
use strukt_model::{
    coerce, Block, DateRule, EditorBlocks, FieldValue, File, HtmlString, Image, JsonField,
    OptionValue, BLOCK_TYPE_KEY, DATETIME_FORMAT, DATE_FORMAT, MATRIX_BLOCK_TAG,
};
use tracing::debug;

use crate::context::CastContext;
use crate::tag::FieldTag;

static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("numeric token pattern is valid"));

/// Converts attribute values of one field type between wire and typed form.
///
/// Implemented by [`FieldCodec`] for the built-in tags. Applications can
/// implement it for their own tags and register it in a
/// [`CodecTable`](crate::CodecTable).
pub trait AttributeCodec: Send + Sync {
    /// Decodes a raw wire value.
    fn decode(&self, raw: &Value, ctx: &CastContext<'_>) -> FieldValue;

    /// Encodes a typed value into its wire form.
    fn encode(&self, value: &FieldValue, ctx: &CastContext<'_>) -> Value;
}

/// The built-in codec for one [`FieldTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCodec {
    tag: FieldTag,
}

impl FieldCodec {
    pub const fn new(tag: FieldTag) -> Self {
        Self { tag }
    }

    /// The codec for a wire tag; unknown tags get the passthrough codec.
    pub fn for_tag(tag: &str) -> Self {
        Self::new(FieldTag::parse(tag))
    }

    pub fn tag(&self) -> FieldTag {
        self.tag
    }
}

impl AttributeCodec for FieldCodec {
    fn decode(&self, raw: &Value, ctx: &CastContext<'_>) -> FieldValue {
        match self.tag {
            FieldTag::Checkbox => FieldValue::Bool(coerce::to_bool(raw)),
            FieldTag::Integer => FieldValue::Integer(coerce::to_int(raw)),
            FieldTag::Float => FieldValue::Float(coerce::to_float(raw)),
            FieldTag::Reference => match coerce::to_int(raw) {
                0 => FieldValue::Null,
                id => FieldValue::Integer(id),
            },
            FieldTag::References => FieldValue::Ids(
                tokens(raw)
                    .iter()
                    .map(|token| coerce::str_to_int(token))
                    .collect(),
            ),
            FieldTag::Tags => FieldValue::Tags(tokens(raw)),
            FieldTag::Multiselect => {
                FieldValue::Options(tokens(raw).iter().map(|t| option_token(t)).collect())
            }
            FieldTag::Json => FieldValue::Json(JsonField::parse(raw)),
            FieldTag::RuleBuilder => decode_rule(raw),
            FieldTag::EditorBlocks => FieldValue::EditorBlocks(EditorBlocks::parse(raw)),
            FieldTag::Html => {
                if coerce::is_blank(raw) {
                    FieldValue::Null
                } else {
                    FieldValue::Html(HtmlString::new(coerce::to_text(raw)))
                }
            }
            FieldTag::Date => parse_datetime(raw)
                .map_or(FieldValue::Null, |dt| FieldValue::Date(dt.date())),
            FieldTag::DateTime => parse_datetime(raw).map_or(FieldValue::Null, FieldValue::DateTime),
            FieldTag::File => File::cast(raw).map_or(FieldValue::Null, FieldValue::File),
            FieldTag::Image => Image::cast(raw).map_or(FieldValue::Null, FieldValue::Image),
            FieldTag::Matrix => decode_matrix(raw, ctx),
            FieldTag::MatrixBlock => decode_block(raw, ctx),
            FieldTag::Passthrough => FieldValue::Raw(raw.clone()),
        }
    }

    fn encode(&self, value: &FieldValue, ctx: &CastContext<'_>) -> Value {
        match self.tag {
            FieldTag::Checkbox => Value::from(if truthy(value) { "1" } else { "0" }),
            FieldTag::Integer | FieldTag::Float | FieldTag::Reference => scalar_text(value),
            FieldTag::References | FieldTag::Tags => joined(value),
            FieldTag::Multiselect => value.to_plain(),
            FieldTag::Json => match value {
                FieldValue::Json(json) => Value::from(json.to_json_string()),
                FieldValue::Raw(raw @ (Value::Array(_) | Value::Object(_))) => {
                    Value::from(raw.to_string())
                }
                other => other.to_plain(),
            },
            FieldTag::RuleBuilder => match value {
                FieldValue::Rule(rule) => Value::from(rule.to_json()),
                other => other.to_plain(),
            },
            FieldTag::EditorBlocks => match value {
                FieldValue::EditorBlocks(doc) => doc.to_raw(),
                other => other.to_plain(),
            },
            FieldTag::Html => value.to_plain(),
            FieldTag::Date => match value {
                FieldValue::Date(d) => Value::from(d.format(DATE_FORMAT).to_string()),
                FieldValue::DateTime(dt) => Value::from(dt.format(DATE_FORMAT).to_string()),
                other => other.to_plain(),
            },
            FieldTag::DateTime => match value.as_datetime() {
                Some(dt) => Value::from(dt.format(DATETIME_FORMAT).to_string()),
                None => value.to_plain(),
            },
            FieldTag::File | FieldTag::Image => encode_media(value),
            FieldTag::Matrix => encode_matrix(value, ctx),
            FieldTag::MatrixBlock => encode_block(value, ctx),
            FieldTag::Passthrough => value.to_plain(),
        }
    }
}

// ── Scalars ──────────────────────────────────────────────────────

/// Splits a comma-separated raw value into trimmed, non-empty tokens.
/// Arrays contribute one token per element.
fn tokens(raw: &Value) -> Vec<String> {
    let parts: Vec<String> = match raw {
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Array(items) => items.iter().map(coerce::to_text).collect(),
        Value::Number(_) => vec![coerce::to_text(raw)],
        _ => Vec::new(),
    };
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn option_token(token: &str) -> OptionValue {
    if !NUMERIC_TOKEN.is_match(token) {
        return OptionValue::Text(token.to_string());
    }
    if token.contains('.') {
        OptionValue::Float(coerce::str_to_float(token))
    } else {
        OptionValue::Int(coerce::str_to_int(token))
    }
}

fn truthy(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => false,
        FieldValue::Bool(b) => *b,
        FieldValue::Integer(i) => *i != 0,
        FieldValue::Float(f) => *f != 0.0,
        FieldValue::Text(s) => !s.is_empty() && s != "0",
        FieldValue::Raw(Value::String(s)) => !s.is_empty() && s != "0",
        FieldValue::Raw(Value::Array(items)) => !items.is_empty(),
        FieldValue::Raw(Value::Object(object)) => !object.is_empty(),
        FieldValue::Raw(raw) => coerce::to_float(raw) != 0.0,
        _ => true,
    }
}

/// Renders a scalar as the string the API stores. `null` becomes `""`.
fn scalar_text(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::from(""),
        FieldValue::Bool(b) => Value::from(if *b { "1" } else { "" }),
        FieldValue::Integer(i) => Value::from(i.to_string()),
        FieldValue::Float(f) => Value::from(f.to_string()),
        FieldValue::Text(s) => Value::from(s.as_str()),
        FieldValue::Html(h) => Value::from(h.as_str()),
        FieldValue::Raw(raw @ (Value::Null | Value::Bool(_) | Value::Number(_))) => {
            Value::from(coerce::to_text(raw))
        }
        other => other.to_plain(),
    }
}

/// Comma-joins list values. Anything that is not a list passes through.
fn joined(value: &FieldValue) -> Value {
    let parts: Vec<String> = match value {
        FieldValue::Tags(tags) => tags.clone(),
        FieldValue::Ids(ids) => ids.iter().map(i64::to_string).collect(),
        FieldValue::Options(options) => options
            .iter()
            .map(|o| match o {
                OptionValue::Int(i) => i.to_string(),
                OptionValue::Float(f) => f.to_string(),
                OptionValue::Text(s) => s.clone(),
            })
            .collect(),
        FieldValue::Raw(Value::Array(items)) => items.iter().map(coerce::to_text).collect(),
        other => return other.to_plain(),
    };
    Value::from(parts.join(","))
}

// ── Rich values ──────────────────────────────────────────────────

fn decode_rule(raw: &Value) -> FieldValue {
    if coerce::is_blank(raw) {
        return FieldValue::Null;
    }
    let json = match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match DateRule::from_json(&json) {
        Ok(rule) => FieldValue::Rule(rule),
        Err(e) => {
            debug!("Discarding unparseable date rule: {}", e);
            FieldValue::Null
        }
    }
}

/// Parses the date-time formats the API emits. Date-only values become
/// midnight; numbers are unix timestamps.
fn parse_datetime(raw: &Value) -> Option<NaiveDateTime> {
    let text = match raw {
        Value::String(s) => s.trim(),
        Value::Number(n) => {
            return n
                .as_i64()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|dt| dt.naive_utc());
        }
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Files and images are written back as their identifier.
fn encode_media(value: &FieldValue) -> Value {
    let identifier = match value {
        FieldValue::File(file) => file.identifier(),
        FieldValue::Image(image) => image.identifier(),
        FieldValue::Raw(raw @ Value::Object(_)) => File::cast(raw).and_then(|f| f.identifier()),
        FieldValue::Null | FieldValue::Raw(Value::Null) => None,
        other => return scalar_text(other),
    };
    identifier.map_or(Value::Null, Value::from)
}

// ── Matrix ───────────────────────────────────────────────────────

fn sequence(raw: &Value) -> Option<Vec<Value>> {
    match raw {
        Value::Array(items) => Some(items.clone()),
        Value::String(s) if !s.trim().is_empty() => match serde_json::from_str(s) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        },
        other if coerce::is_blank(other) => Some(Vec::new()),
        _ => None,
    }
}

fn block_type_of(raw: &Value) -> Option<&str> {
    raw.get(BLOCK_TYPE_KEY).and_then(Value::as_str)
}

fn decode_matrix(raw: &Value, ctx: &CastContext<'_>) -> FieldValue {
    let Some(matrix) = ctx.definition().filter(|d| d.is_matrix()) else {
        debug!("No matrix definition at '{}', passing value through", ctx.path());
        return FieldValue::Raw(raw.clone());
    };
    let Some(items) = sequence(raw) else {
        debug!("Matrix value at '{}' is not a list, passing through", ctx.path());
        return FieldValue::Raw(raw.clone());
    };

    let blocks = items
        .iter()
        .map(|item| match block_type_of(item) {
            Some(block_type) if matrix.block_type(block_type).is_some() => {
                ctx.child(block_type).decode(MATRIX_BLOCK_TAG, item)
            }
            other => {
                debug!(
                    "Unknown block type {:?} in matrix '{}', passing block through",
                    other,
                    ctx.path()
                );
                FieldValue::Raw(item.clone())
            }
        })
        .collect();
    FieldValue::Matrix(blocks)
}

fn decode_block(raw: &Value, ctx: &CastContext<'_>) -> FieldValue {
    let (Some(definition), Some(object)) = (ctx.definition(), raw.as_object()) else {
        debug!("Unresolvable block at '{}', passing value through", ctx.path());
        return FieldValue::Raw(raw.clone());
    };

    let block_type = object
        .get(BLOCK_TYPE_KEY)
        .and_then(Value::as_str)
        .unwrap_or(&definition.alias);
    let mut block = Block::new(block_type);
    for field in &definition.fields {
        let sub = object.get(&field.alias).unwrap_or(&Value::Null);
        let value = ctx.child(&field.alias).decode(&field.tag, sub);
        block.insert(field.alias.clone(), flattened(value));
    }
    FieldValue::Block(block)
}

/// Block fields keep structured values and nulls; everything else is stored
/// in its plain form.
fn flattened(value: FieldValue) -> FieldValue {
    if value.is_structured() || matches!(value, FieldValue::Null | FieldValue::Raw(_)) {
        value
    } else {
        FieldValue::Raw(value.to_plain())
    }
}

fn encode_matrix(value: &FieldValue, ctx: &CastContext<'_>) -> Value {
    let Some(matrix) = ctx.definition().filter(|d| d.is_matrix()) else {
        debug!("No matrix definition at '{}', passing value through", ctx.path());
        return value.to_plain();
    };
    let items: Vec<FieldValue> = match value {
        FieldValue::Matrix(items) => items.clone(),
        FieldValue::Raw(Value::Array(items)) => {
            items.iter().cloned().map(FieldValue::Raw).collect()
        }
        FieldValue::Null | FieldValue::Raw(Value::Null) => Vec::new(),
        other => return other.to_plain(),
    };

    let encoded = items
        .iter()
        .map(|item| {
            let block_type = match item {
                FieldValue::Block(block) => Some(block.block_type()),
                FieldValue::Raw(raw) => block_type_of(raw),
                _ => None,
            };
            match block_type {
                Some(block_type) if matrix.block_type(block_type).is_some() => {
                    ctx.child(block_type).encode(MATRIX_BLOCK_TAG, item)
                }
                _ => item.to_plain(),
            }
        })
        .collect();
    Value::Array(encoded)
}

fn encode_block(value: &FieldValue, ctx: &CastContext<'_>) -> Value {
    let Some(definition) = ctx.definition() else {
        debug!("Unresolvable block at '{}', passing value through", ctx.path());
        return value.to_plain();
    };
    let block_type = match value {
        FieldValue::Block(block) => block.block_type(),
        FieldValue::Raw(raw @ Value::Object(_)) => {
            block_type_of(raw).unwrap_or(&definition.alias)
        }
        other => return other.to_plain(),
    };

    let mut encoded = Map::new();
    for field in &definition.fields {
        let sub = block_field(value, &field.alias);
        encoded.insert(
            field.alias.clone(),
            ctx.child(&field.alias).encode(&field.tag, &sub),
        );
    }
    encoded.insert(BLOCK_TYPE_KEY.to_string(), Value::from(block_type));
    Value::Object(encoded)
}

fn block_field(block: &FieldValue, alias: &str) -> FieldValue {
    match block {
        FieldValue::Block(block) => block.get(alias).cloned().unwrap_or(FieldValue::Null),
        FieldValue::Raw(raw) => raw
            .get(alias)
            .cloned()
            .map_or(FieldValue::Null, FieldValue::Raw),
        _ => FieldValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_token_pattern() {
        assert!(matches!(option_token("12"), OptionValue::Int(12)));
        assert!(matches!(option_token("2.5"), OptionValue::Float(f) if f == 2.5));
        assert!(matches!(option_token("-3"), OptionValue::Text(_)));
        assert!(matches!(option_token("1."), OptionValue::Text(_)));
        assert!(matches!(option_token("1e3"), OptionValue::Text(_)));
    }

    #[test]
    fn tokens_trim_and_drop_empties() {
        assert_eq!(tokens(&json!(" a , b,,c ,")), vec!["a", "b", "c"]);
        assert_eq!(tokens(&json!(["x", 2, ""])), vec!["x", "2"]);
        assert_eq!(tokens(&json!(7)), vec!["7"]);
        assert!(tokens(&json!(null)).is_empty());
    }

    #[test]
    fn datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime(&json!("2024-03-09 14:30:00")), Some(expected));
        assert_eq!(parse_datetime(&json!("2024-03-09T14:30:00")), Some(expected));
        assert_eq!(parse_datetime(&json!("2024-03-09T14:30:00+02:00")), Some(expected));
        assert_eq!(parse_datetime(&json!("2024-03-09 14:30")), Some(expected));
        assert_eq!(
            parse_datetime(&json!("2024-03-09")),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime(&json!("yesterday")), None);
        assert_eq!(parse_datetime(&json!(false)), None);
    }

    #[test]
    fn checkbox_truthiness() {
        assert!(truthy(&FieldValue::Bool(true)));
        assert!(!truthy(&FieldValue::Text("0".into())));
        assert!(!truthy(&FieldValue::Raw(json!(""))));
        assert!(truthy(&FieldValue::Raw(json!(1))));
        assert!(!truthy(&FieldValue::Raw(json!(0))));
        assert!(truthy(&FieldValue::Raw(json!([1]))));
        assert!(!truthy(&FieldValue::Null));
    }
}
