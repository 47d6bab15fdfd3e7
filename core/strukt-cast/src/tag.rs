use std::fmt;

/// The casting behaviors a field type tag can select.
///
/// Several wire tags share one behavior (`entry`, `customer` and
/// `customer-group` all hold a single id). Tags the crate does not know map
/// to [`FieldTag::Passthrough`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTag {
    Checkbox,
    Integer,
    Float,
    /// A single referenced id (`entry`, `customer`, `customer-group`).
    Reference,
    /// A comma-separated id list (`entries`, `entriessortable`, `customers`,
    /// `customer-groups`).
    References,
    Tags,
    Multiselect,
    Json,
    RuleBuilder,
    EditorBlocks,
    /// Rich text from `editor-small` / `editor-large`.
    Html,
    Date,
    DateTime,
    File,
    Image,
    Matrix,
    MatrixBlock,
    Passthrough,
}

/// Every wire tag with a built-in behavior, synonyms included.
pub const BUILTIN_TAGS: &[(&str, FieldTag)] = &[
    ("checkbox", FieldTag::Checkbox),
    ("integer", FieldTag::Integer),
    ("float", FieldTag::Float),
    ("entry", FieldTag::Reference),
    ("customer", FieldTag::Reference),
    ("customer-group", FieldTag::Reference),
    ("entries", FieldTag::References),
    ("entriessortable", FieldTag::References),
    ("customers", FieldTag::References),
    ("customer-groups", FieldTag::References),
    ("tags", FieldTag::Tags),
    ("multiselect", FieldTag::Multiselect),
    ("json", FieldTag::Json),
    ("rule-builder", FieldTag::RuleBuilder),
    ("editor-blocks", FieldTag::EditorBlocks),
    ("editor-small", FieldTag::Html),
    ("editor-large", FieldTag::Html),
    ("date", FieldTag::Date),
    ("datetime", FieldTag::DateTime),
    ("file", FieldTag::File),
    ("image", FieldTag::Image),
    ("matrix", FieldTag::Matrix),
    ("matrix_block", FieldTag::MatrixBlock),
];

impl FieldTag {
    /// Maps a wire tag to its behavior. Unknown tags pass through.
    pub fn parse(tag: &str) -> Self {
        BUILTIN_TAGS
            .iter()
            .find(|(name, _)| *name == tag)
            .map_or(Self::Passthrough, |(_, t)| *t)
    }

    /// The canonical wire tag of this behavior.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Reference => "entry",
            Self::References => "entries",
            Self::Tags => "tags",
            Self::Multiselect => "multiselect",
            Self::Json => "json",
            Self::RuleBuilder => "rule-builder",
            Self::EditorBlocks => "editor-blocks",
            Self::Html => "editor-large",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::File => "file",
            Self::Image => "image",
            Self::Matrix => "matrix",
            Self::MatrixBlock => "matrix_block",
            Self::Passthrough => "passthrough",
        }
    }
}

impl From<&str> for FieldTag {
    fn from(tag: &str) -> Self {
        Self::parse(tag)
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_share_behavior() {
        assert_eq!(FieldTag::parse("customer-group"), FieldTag::Reference);
        assert_eq!(FieldTag::parse("customer-groups"), FieldTag::References);
        assert_eq!(FieldTag::parse("editor-small"), FieldTag::Html);
    }

    #[test]
    fn unknown_tags_pass_through() {
        assert_eq!(FieldTag::parse("some-future-tag"), FieldTag::Passthrough);
        assert_eq!(FieldTag::parse(""), FieldTag::Passthrough);
        assert_eq!(FieldTag::parse("Checkbox"), FieldTag::Passthrough);
    }

    #[test]
    fn canonical_names_parse_back() {
        for (_, tag) in BUILTIN_TAGS {
            assert_eq!(FieldTag::parse(tag.as_str()), *tag);
        }
    }
}
