//! Best-effort scalar coercion for raw wire values.
//!
//! The content API is loose about scalar shapes: integers arrive as numbers,
//! numeric strings or booleans, and empty values as `null`, `""` or `false`.
//! These helpers never fail; anything unusable coerces to zero or empty.

use serde_json::Value;

/// Coerces a raw value to an integer.
///
/// Strings use their leading numeric prefix (`"12abc"` → 12, `"1.9"` → 1);
/// floats are truncated; booleans map to 0/1; everything else is 0.
#[must_use]
pub fn to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => str_to_int(s),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Coerces a raw value to a float using the same rules as [`to_int`].
#[must_use]
pub fn to_float(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => str_to_float(s),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

/// Coerces a raw value to a boolean the way checkbox fields store them:
/// true if the value is a non-zero number (or numeric string).
#[must_use]
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => str_to_int(s) != 0,
        _ => false,
    }
}

/// Renders a scalar raw value as text. Arrays and objects render as empty.
#[must_use]
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        _ => String::new(),
    }
}

/// Returns true for values the API uses to mean "nothing here":
/// `null`, `false`, empty strings, empty arrays and empty objects.
#[must_use]
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// Parses the leading integer of a string (`" -42px"` → -42).
#[must_use]
pub fn str_to_int(s: &str) -> i64 {
    let prefix = numeric_prefix(s.trim_start(), false);
    if let Ok(i) = prefix.parse::<i64>() {
        return i;
    }
    // Overlong digit runs saturate instead of collapsing to zero.
    prefix.parse::<f64>().map(|f| f as i64).unwrap_or(0)
}

/// Parses the leading decimal number of a string (`"2.5kg"` → 2.5).
#[must_use]
pub fn str_to_float(s: &str) -> f64 {
    numeric_prefix(s.trim_start(), true)
        .parse::<f64>()
        .unwrap_or(0.0)
}

fn numeric_prefix(s: &str, allow_fraction: bool) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if allow_fraction && end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > end + 1 || end > digits_start {
            end = frac_end;
        }
    }
    if end == digits_start {
        return "";
    }
    &s[..end]
}
