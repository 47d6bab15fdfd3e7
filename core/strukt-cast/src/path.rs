use std::fmt;

/// Position of a value inside a structure's schema, as the ordered aliases
/// leading to it.
///
/// `["content"]` is the top-level `content` field; `["content", "gallery",
/// "caption"]` is the `caption` field of a `gallery` block inside it. Paths
/// are immutable: descending returns a new path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SchemaPath {
    segments: Vec<String>,
}

impl SchemaPath {
    /// The empty path (the schema root).
    pub fn root() -> Self {
        Self::default()
    }

    /// A path of one top-level alias.
    pub fn field(alias: impl Into<String>) -> Self {
        Self {
            segments: vec![alias.into()],
        }
    }

    /// Returns this path extended by one segment.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last segment, if any.
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SchemaPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_leaves_parent_untouched() {
        let parent = SchemaPath::field("content");
        let child = parent.child("gallery");
        assert_eq!(parent.segments(), ["content"]);
        assert_eq!(child.segments(), ["content", "gallery"]);
        assert_eq!(child.leaf(), Some("gallery"));
    }

    #[test]
    fn display_joins_with_dots() {
        let path: SchemaPath = ["content", "gallery", "caption"].into_iter().collect();
        assert_eq!(path.to_string(), "content.gallery.caption");
        assert_eq!(SchemaPath::root().to_string(), "");
    }
}
