//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ConfigWarning;
use crate::error::ConfigError;

use super::loader;

/// How composite identities are matched against the ones already interned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompositeLookup {
    /// Linear content-equality scan over the live composite identities
    #[default]
    Linear,
    /// Content-hash index kept next to the slot table
    Indexed,
}

impl CompositeLookup {
    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "linear" | "scan" => Some(Self::Linear),
            "indexed" | "index" | "hash" => Some(Self::Indexed),
            _ => None,
        }
    }
}

/// Registry configuration
///
/// ```toml
/// composite_lookup = "indexed"
/// composite_key_limit = 65536
/// drop_empty_tables = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub composite_lookup: CompositeLookup,

    /// Maximum number of composite identities live at once, per record type
    #[serde(default = "default_composite_key_limit")]
    pub composite_key_limit: u32,

    /// Forget a record type's table once its last record is gone
    #[serde(default = "default_true")]
    pub drop_empty_tables: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            composite_lookup: CompositeLookup::default(),
            composite_key_limit: default_composite_key_limit(),
            drop_empty_tables: true,
        }
    }
}

fn default_composite_key_limit() -> u32 {
    u32::MAX
}

fn default_true() -> bool {
    true
}

impl RegistryConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Load configuration and collect warnings for unknown keys
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Load from `path` when it exists, otherwise defaults; env overrides
    /// apply either way
    pub fn load_or_default(path: Option<&Path>) -> Self {
        loader::load_or_default(path)
    }

    /// Apply `INTERNED_RECORDS_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }
}
