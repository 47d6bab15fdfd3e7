//! Engine configuration, read from a TOML file.
//!
//! ```toml
//! locale = "nb_NO"
//! fallback_locale = "en"
//! reserved_keys = ["name"]
//! connection = "default"
//! registration_policy = "reject-if-bound"
//! schema_dir = "schemas"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strukt_cast::DEFAULT_RESERVED_KEYS;
use strukt_types::{Locale, LocaleConfig};
use tracing::{info, warn};

use crate::error::ConfigResult;
use crate::models::RegistrationPolicy;
use crate::schemas::DEFAULT_CONNECTION;

/// Settings for a [`StructureEngine`](crate::StructureEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Active locale for localized reads.
    pub locale: Locale,
    /// Locale consulted when the active one has no value.
    pub fallback_locale: Locale,
    /// Keys read without fallback-locale candidates.
    pub reserved_keys: Vec<String>,
    /// API connection name; prefixes cache keys unless `default`.
    pub connection: String,
    pub registration_policy: RegistrationPolicy,
    /// Directory of `{id}.json` structure files for offline use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            fallback_locale: Locale::default(),
            reserved_keys: DEFAULT_RESERVED_KEYS.iter().map(|k| k.to_string()).collect(),
            connection: DEFAULT_CONNECTION.to_string(),
            registration_policy: RegistrationPolicy::default(),
            schema_dir: None,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration, failing on malformed input.
    pub fn from_toml_str(toml_str: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads a configuration file, failing on IO or parse errors.
    pub fn read(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads a configuration file.
    /// Falls back to defaults with a warning if the file is missing or invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No engine config at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::read(path) {
            Ok(config) => {
                info!("Loaded engine config from {:?}", path);
                config
            }
            Err(e) => {
                warn!(
                    "Failed to load engine config {:?}: {}. Falling back to defaults.",
                    path, e
                );
                Self::default()
            }
        }
    }

    /// The ambient locale settings.
    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::new(self.locale.clone(), self.fallback_locale.clone())
    }
}
