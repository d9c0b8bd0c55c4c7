use crate::error::ConfigError;
use crate::reference::DEFAULT_SIGIL;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reserved field names and load ordering for a scenario.
///
/// Every key is optional in TOML:
///
/// ```toml
/// id_field = "id"
/// alias_field = "_alias"
/// reference_sigil = "$"
/// load_priority = ["genre", "actor"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Field holding an entity's explicit identifier.
    pub id_field: String,
    /// Field holding an entity's alias.
    pub alias_field: String,
    /// Prefix marking a string value as a reference.
    pub reference_sigil: String,
    /// Types loaded before any other, in this order.
    pub load_priority: Vec<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            alias_field: "_alias".to_string(),
            reference_sigil: DEFAULT_SIGIL.to_string(),
            load_priority: Vec::new(),
        }
    }
}

impl ScenarioConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects empty reserved names. An empty sigil would turn every string
    /// value into a reference.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("id_field", &self.id_field),
            ("alias_field", &self.alias_field),
            ("reference_sigil", &self.reference_sigil),
        ];
        match fields.into_iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(ConfigError::EmptyField(name)),
            None => Ok(()),
        }
    }
}
