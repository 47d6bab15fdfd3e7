//! Error types for the engine.

use strukt_types::StructureId;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised by a [`Transport`](crate::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The API has nothing at the requested path.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request failed before a response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not valid JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for record type registration.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while registering record types.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The record type does not represent the structure it was registered
    /// for.
    #[error("{model} cannot be registered for structure {structure_id}: {reason}")]
    InvalidRegistration {
        structure_id: StructureId,
        model: String,
        reason: String,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while reading an engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML, or a value (such as a locale) that does not parse.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors raised while assembling a [`StructureEngine`](crate::StructureEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// No transport was supplied to the builder.
    #[error("no transport configured")]
    MissingTransport,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
