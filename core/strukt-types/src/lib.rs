//! Core type definitions for strukt.
//!
//! This crate defines the small, schema-agnostic types used throughout the
//! casting engine:
//! - Structure and entry identifiers (integer ids assigned by the content API)
//! - Locales and locale configuration for localized attribute reads
//!
//! Field definitions, typed values and records live in `strukt-model`.

mod ids;
mod locale;

pub use ids::{EntryId, StructureId};
pub use locale::{Locale, LocaleConfig};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("invalid locale: {0}")]
    InvalidLocale(String),
}
