//! Record types: which concrete entry type represents each structure.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use strukt_model::{defaults::HIDDEN_DEFAULT_FIELDS, Record};
use strukt_types::StructureId;
use tracing::{debug, info, warn};

use crate::error::{RegistryError, RegistryResult};

/// A record type: the application-side representation of one structure's
/// entries.
///
/// Implementations declare the structure they represent and may adjust how
/// entries are cast and projected. Only [`structure_id`](Self::structure_id)
/// and [`name`](Self::name) are required.
pub trait EntryModel: Send + Sync {
    /// The structure this type represents. `None` for generic types.
    fn structure_id(&self) -> Option<StructureId>;

    /// Human-readable type name used in logs and errors.
    fn name(&self) -> &str;

    /// Attributes left out of [`StructureEngine::to_visible_map`](crate::StructureEngine::to_visible_map).
    fn hidden_fields(&self) -> &[&str] {
        HIDDEN_DEFAULT_FIELDS
    }

    /// Alias → tag casts that take precedence over the structure schema.
    fn cast_overrides(&self) -> &[(&str, &str)] {
        &[]
    }

    /// Called when an entry is materialized as this type.
    fn on_retrieved(&self, _record: &mut Record) {}
}

/// The record type used for structures with no registered type.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericEntry;

impl EntryModel for GenericEntry {
    fn structure_id(&self) -> Option<StructureId> {
        None
    }

    fn name(&self) -> &str {
        "entry"
    }
}

/// What happens when a structure id that already has a record type is
/// registered again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistrationPolicy {
    /// The newer registration replaces the older one.
    #[default]
    Overwrite,
    /// The first registration is kept and later ones are refused.
    RejectIfBound,
}

/// An entry paired with the record type that represents it.
#[derive(Clone)]
pub struct TypedEntry {
    record: Record,
    model: Arc<dyn EntryModel>,
}

impl TypedEntry {
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn model(&self) -> &Arc<dyn EntryModel> {
        &self.model
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// True if the entry resolved to a structure-specific type.
    pub fn is_specialized(&self) -> bool {
        self.model.structure_id().is_some()
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

impl std::fmt::Debug for TypedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedEntry")
            .field("model", &self.model.name())
            .field("record", &self.record)
            .finish()
    }
}

/// Maps structure ids to record types, falling back to [`GenericEntry`].
pub struct RecordTypeRegistry {
    models: RwLock<HashMap<StructureId, Arc<dyn EntryModel>>>,
    policy: RegistrationPolicy,
    fallback: Arc<dyn EntryModel>,
}

impl RecordTypeRegistry {
    pub fn new(policy: RegistrationPolicy) -> Self {
        Self {
            models: RwLock::new(HashMap::new()),
            policy,
            fallback: Arc::new(GenericEntry),
        }
    }

    /// Replaces the type returned for unregistered structures.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn EntryModel>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn policy(&self) -> RegistrationPolicy {
        self.policy
    }

    /// Binds `model` to `structure_id`.
    ///
    /// Returns `Ok(false)` when the id is already bound and the policy is
    /// [`RegistrationPolicy::RejectIfBound`]. Fails if the model does not
    /// declare `structure_id` as its own.
    pub fn register(
        &self,
        structure_id: StructureId,
        model: Arc<dyn EntryModel>,
    ) -> RegistryResult<bool> {
        match model.structure_id() {
            Some(declared) if declared == structure_id => {}
            Some(declared) => {
                return Err(RegistryError::InvalidRegistration {
                    structure_id,
                    model: model.name().to_string(),
                    reason: format!("it declares structure {declared}"),
                });
            }
            None => {
                return Err(RegistryError::InvalidRegistration {
                    structure_id,
                    model: model.name().to_string(),
                    reason: "it declares no structure".to_string(),
                });
            }
        }

        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = models.get(&structure_id) {
            if self.policy == RegistrationPolicy::RejectIfBound {
                debug!(
                    "Structure {} already bound to {}, keeping it over {}",
                    structure_id,
                    existing.name(),
                    model.name()
                );
                return Ok(false);
            }
            debug!(
                "Structure {} rebound from {} to {}",
                structure_id,
                existing.name(),
                model.name()
            );
        }
        models.insert(structure_id, model);
        Ok(true)
    }

    /// Binds `model` to the structure it declares.
    pub fn register_model(&self, model: Arc<dyn EntryModel>) -> RegistryResult<bool> {
        let Some(structure_id) = model.structure_id() else {
            return Err(RegistryError::InvalidRegistration {
                structure_id: StructureId::new(0),
                model: model.name().to_string(),
                reason: "it declares no structure".to_string(),
            });
        };
        self.register(structure_id, model)
    }

    /// Registers many models at startup.
    ///
    /// Models whose structure is already bound are skipped; failures are
    /// logged and do not stop the rest. Returns how many were registered.
    pub fn register_all<I>(&self, models: I) -> usize
    where
        I: IntoIterator<Item = Arc<dyn EntryModel>>,
    {
        let mut registered = 0;
        for model in models {
            if model.structure_id().is_some_and(|id| self.is_registered(id)) {
                debug!("Skipping {}: structure already registered", model.name());
                continue;
            }
            match self.register_model(model) {
                Ok(true) => registered += 1,
                Ok(false) => {}
                Err(e) => warn!("Failed to register record type: {}", e),
            }
        }
        info!("Registered {} record types", registered);
        registered
    }

    pub fn is_registered(&self, structure_id: StructureId) -> bool {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&structure_id)
    }

    /// The record type of `structure_id`, or the fallback.
    pub fn resolve(&self, structure_id: StructureId) -> Arc<dyn EntryModel> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&structure_id)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    /// The record type of an entry, by its `directory_id`.
    pub fn resolve_for(&self, record: &Record) -> Arc<dyn EntryModel> {
        match record.structure_id() {
            Some(id) => self.resolve(id),
            None => Arc::clone(&self.fallback),
        }
    }

    /// Re-materializes a generic entry as its structure's record type,
    /// running the type's `on_retrieved` hook on a copy of the record.
    pub fn materialize(&self, record: &Record) -> TypedEntry {
        let model = self.resolve_for(record);
        let mut record = record.clone();
        model.on_retrieved(&mut record);
        TypedEntry { record, model }
    }

    /// Number of bound structures.
    pub fn len(&self) -> usize {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecordTypeRegistry {
    fn default() -> Self {
        Self::new(RegistrationPolicy::default())
    }
}

impl std::fmt::Debug for RecordTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordTypeRegistry")
            .field("policy", &self.policy)
            .field("bound", &self.len())
            .finish_non_exhaustive()
    }
}
