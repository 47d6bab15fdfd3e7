//! Locale identifiers used for localized attribute lookups.
//!
//! Localized attributes are stored next to each other on an entry with the
//! locale appended to the key (`title_nb_NO`, `title_nb`, `title`). A locale
//! is either a bare language (`nb`) or `language_REGION` (`nb_NO`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// A validated locale such as `en`, `nb_NO` or `en_US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Parses a locale, rejecting empty strings and embedded whitespace.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('_')
            || trimmed.chars().any(|c| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        {
            return Err(Error::InvalidLocale(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the full locale string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the language part (everything before the first `_`).
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }

    /// Returns true if the locale carries a region (`nb_NO`).
    #[must_use]
    pub fn has_region(&self) -> bool {
        self.language().len() != self.0.len()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

/// The ambient locale settings of a request: the active locale and the
/// application-wide fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Locale requested by the current caller.
    pub locale: Locale,
    /// Locale consulted when the active one has no value.
    pub fallback_locale: Locale,
}

impl LocaleConfig {
    /// Creates a config from an active and a fallback locale.
    #[must_use]
    pub fn new(locale: Locale, fallback_locale: Locale) -> Self {
        Self {
            locale,
            fallback_locale,
        }
    }

    /// Creates a config where the active locale is also the fallback.
    #[must_use]
    pub fn single(locale: Locale) -> Self {
        Self {
            fallback_locale: locale.clone(),
            locale,
        }
    }

    /// Returns a copy with the active locale replaced (a "forced" locale).
    #[must_use]
    pub fn with_locale(&self, locale: Locale) -> Self {
        Self {
            locale,
            fallback_locale: self.fallback_locale.clone(),
        }
    }

    /// Returns true if a distinct fallback locale is configured.
    #[must_use]
    pub fn has_distinct_fallback(&self) -> bool {
        self.locale != self.fallback_locale
    }
}
