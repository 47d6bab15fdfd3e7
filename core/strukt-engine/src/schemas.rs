use std::sync::Arc;

use strukt_model::{FieldTags, Schema};
use strukt_types::StructureId;
use tracing::{debug, warn};

use crate::cache::{Cache, MemoryCache};
use crate::transport::{structure_path, Transport};

/// Name of the connection whose cache keys carry no prefix.
pub const DEFAULT_CONNECTION: &str = "default";

/// Fetches structure schemas through a [`Transport`] and memoizes them.
///
/// Each schema is fetched at most once per registry. Failed fetches are
/// logged and retried on the next call.
pub struct SchemaRegistry {
    transport: Arc<dyn Transport>,
    schemas: Arc<dyn Cache<Arc<Schema>>>,
    field_tags: Arc<dyn Cache<Arc<FieldTags>>>,
    connection: String,
}

impl SchemaRegistry {
    /// A registry on the default connection with in-memory caches.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            schemas: Arc::new(MemoryCache::<Arc<Schema>>::new()),
            field_tags: Arc::new(MemoryCache::<Arc<FieldTags>>::new()),
            connection: DEFAULT_CONNECTION.to_string(),
        }
    }

    /// Names the API connection; non-default names prefix every cache key.
    #[must_use]
    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = connection.into();
        self
    }

    /// Replaces the schema cache.
    #[must_use]
    pub fn with_schema_cache(mut self, cache: Arc<dyn Cache<Arc<Schema>>>) -> Self {
        self.schemas = cache;
        self
    }

    /// Replaces the field tag cache.
    #[must_use]
    pub fn with_field_tag_cache(mut self, cache: Arc<dyn Cache<Arc<FieldTags>>>) -> Self {
        self.field_tags = cache;
        self
    }

    pub fn connection(&self) -> &str {
        &self.connection
    }

    /// The cache key of `suffix` on this registry's connection.
    pub fn cache_key(&self, suffix: &str) -> String {
        if self.connection.is_empty() || self.connection == DEFAULT_CONNECTION {
            suffix.to_string()
        } else {
            format!("{}/{}", self.connection, suffix)
        }
    }

    /// Returns the schema of structure `id`, fetching it on first use.
    pub fn retrieve(&self, id: StructureId) -> Option<Arc<Schema>> {
        let key = self.cache_key(&format!("structures/{id}"));
        self.schemas.remember_forever(&key, &|| self.fetch(id))
    }

    /// Returns the alias → tag map of structure `id`'s top-level fields.
    pub fn field_tags(&self, id: StructureId) -> Option<Arc<FieldTags>> {
        let key = self.cache_key(&format!("structures/{id}/casts"));
        self.field_tags.remember_forever(&key, &|| {
            self.retrieve(id).map(|schema| Arc::new(schema.field_tags()))
        })
    }

    /// Drops the cached schema and field tags of `id`.
    pub fn forget(&self, id: StructureId) {
        self.schemas.forget(&self.cache_key(&format!("structures/{id}")));
        self.field_tags
            .forget(&self.cache_key(&format!("structures/{id}/casts")));
    }

    fn fetch(&self, id: StructureId) -> Option<Arc<Schema>> {
        let path = structure_path(id.get());
        let body = match self.transport.get(&path) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to fetch structure {}: {}", id, e);
                return None;
            }
        };
        match Schema::from_value(body) {
            Ok(schema) => {
                debug!(
                    "Fetched structure {} ({} fields) on connection '{}'",
                    id,
                    schema.fields.len(),
                    self.connection
                );
                Some(Arc::new(schema))
            }
            Err(e) => {
                warn!("Structure {} returned an unreadable schema: {}", id, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}
