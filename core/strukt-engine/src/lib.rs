//! Structure engine for strukt.
//!
//! Ties the casting layer to the content API:
//! - [`Transport`] / [`DirectoryTransport`]: where structure definitions come from
//! - [`Cache`] / [`MemoryCache`]: memoization of fetched definitions
//! - [`SchemaRegistry`]: structure id → schema, fetched once
//! - [`RecordTypeRegistry`] / [`EntryModel`]: structure id → record type
//! - [`EngineConfig`]: locale, connection and registration settings
//! - [`StructureEngine`]: reads and writes entry attributes through all of the above
//!
//! Everything is synchronous and shareable across threads.

mod cache;
mod config;
mod engine;
mod error;
mod models;
mod schemas;
mod transport;

pub use cache::{Cache, MemoryCache};
pub use config::EngineConfig;
pub use engine::{StructureEngine, StructureEngineBuilder};
pub use error::{
    ConfigError, ConfigResult, EngineError, RegistryError, RegistryResult, TransportError,
    TransportResult,
};
pub use models::{EntryModel, GenericEntry, RecordTypeRegistry, RegistrationPolicy, TypedEntry};
pub use schemas::{SchemaRegistry, DEFAULT_CONNECTION};
pub use transport::{structure_path, DirectoryTransport, Transport};
