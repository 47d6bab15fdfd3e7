//! Identifier types used throughout strukt.
//!
//! The content API assigns positive integer ids to both structures and
//! entries. On the wire they show up as numbers or numeric strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Identifier of a structure (content type). Entries refer to it through
/// their `directory_id` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureId(u64);

impl StructureId {
    /// Creates a structure id from a raw integer.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Extracts a structure id from a raw wire value.
    ///
    /// Accepts positive numbers and numeric strings; anything else
    /// (including `0`) yields `None`.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        positive_id(value).map(Self)
    }
}

impl From<u64> for StructureId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StructureId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_positive(s).map(Self)
    }
}

/// Identifier of a single entry within a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    /// Creates an entry id from a raw integer.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying integer.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Extracts an entry id from a raw wire value.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        positive_id(value).map(Self)
    }
}

impl From<u64> for EntryId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_positive(s).map(Self)
    }
}

fn parse_positive(s: &str) -> Result<u64> {
    match s.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(Error::InvalidId(s.to_string())),
        Ok(id) => Ok(id),
    }
}

fn positive_id(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f as u64))
            .filter(|id| *id > 0),
        serde_json::Value::String(s) => parse_positive(s).ok(),
        _ => None,
    }
}
