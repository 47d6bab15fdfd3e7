//! Platform fields present on every entry regardless of its structure.

/// Casts applied to platform fields that structure schemas do not describe.
pub const DEFAULT_FIELD_TAGS: &[(&str, &str)] = &[
    ("id", "integer"),
    ("directory_id", "integer"),
    ("revision", "integer"),
    ("published", "checkbox"),
    ("userid", "integer"),
    ("use_time", "checkbox"),
    ("start", "date"),
    ("stop", "date"),
    ("public", "checkbox"),
    ("created", "datetime"),
    ("updated", "datetime"),
];

/// Platform fields left out of an entry's outward projection by default.
pub const HIDDEN_DEFAULT_FIELDS: &[&str] = &[
    "directory_id",
    "title",
    "revision",
    "published",
    "userid",
    "use_time",
    "start",
    "stop",
    "tags",
    "public",
    "authgroups",
    "variants",
];

/// Returns the cast tag of a platform field.
pub fn default_field_tag(key: &str) -> Option<&'static str> {
    DEFAULT_FIELD_TAGS
        .iter()
        .find(|(field, _)| *field == key)
        .map(|(_, tag)| *tag)
}
