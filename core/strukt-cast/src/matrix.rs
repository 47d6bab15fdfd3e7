use strukt_model::{FieldDefinition, Schema};

use crate::path::SchemaPath;

/// Walks a schema path down to the field definition it names.
///
/// The first segment is looked up among the schema's top-level fields. Each
/// further segment descends one level: into a matrix field's `blocks`, or
/// into any other definition's `fields`.
#[derive(Debug, Clone, Copy)]
pub struct MatrixResolver<'s> {
    schema: &'s Schema,
}

impl<'s> MatrixResolver<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    /// Resolves `path`, or `None` if any segment is missing.
    pub fn resolve(&self, path: &SchemaPath) -> Option<&'s FieldDefinition> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.schema.field(first)?;
        for segment in rest {
            current = current.children().iter().find(|f| f.alias == *segment)?;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strukt_model::FieldDefinition as F;

    fn make_schema() -> Schema {
        Schema::new(
            1,
            "Pages",
            vec![
                F::new("title", "text"),
                F::matrix(
                    "content",
                    vec![
                        F::block("text", vec![F::new("body", "editor-large")]),
                        F::block(
                            "columns",
                            vec![F::matrix(
                                "inner",
                                vec![F::block("quote", vec![F::new("author", "text")])],
                            )],
                        ),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn resolves_top_level_field() {
        let schema = make_schema();
        let resolver = MatrixResolver::new(&schema);
        assert_eq!(resolver.resolve(&SchemaPath::field("title")).unwrap().tag, "text");
    }

    #[test]
    fn resolves_nested_matrix_paths() {
        let schema = make_schema();
        let resolver = MatrixResolver::new(&schema);
        let path: SchemaPath = ["content", "columns", "inner", "quote", "author"]
            .into_iter()
            .collect();
        assert_eq!(resolver.resolve(&path).unwrap().alias, "author");
    }

    #[test]
    fn missing_segments_resolve_to_none() {
        let schema = make_schema();
        let resolver = MatrixResolver::new(&schema);
        assert!(resolver.resolve(&SchemaPath::root()).is_none());
        assert!(resolver.resolve(&SchemaPath::field("nope")).is_none());
        let path: SchemaPath = ["content", "video"].into_iter().collect();
        assert!(resolver.resolve(&path).is_none());
    }
}
