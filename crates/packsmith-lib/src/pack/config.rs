//! Installed mod configuration
//!
//! Each installed mod lives in its own directory with a `ModConfig.json`
//! describing it. Only the fields pack creation needs are modelled; the
//! `PluginData` object is carried through untouched because it holds the
//! update resolver settings that packs must preserve.

use crate::api::ModIdentity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// File name of a mod's configuration inside its directory
pub const MOD_CONFIG_FILE: &str = "ModConfig.json";

/// Plugin data keys that configure an update resolver
pub const RESOLVER_KEYS: &[&str] = &["GitHubRelease", "GameBanana", "NuGet"];

/// Mod configuration errors
#[derive(Debug, Error)]
pub enum ModConfigError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Mod config '{path}' is missing {field}")]
    MissingField { path: PathBuf, field: &'static str },
}

/// Configuration of one installed mod
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModConfig {
    pub mod_id: String,
    pub mod_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_description: Option<String>,
    #[serde(default)]
    pub plugin_data: Map<String, Value>,
}

impl ModConfig {
    pub fn new(mod_id: impl Into<String>, mod_name: impl Into<String>) -> Self {
        Self {
            mod_id: mod_id.into(),
            mod_name: mod_name.into(),
            mod_author: None,
            mod_version: None,
            mod_description: None,
            plugin_data: Map::new(),
        }
    }

    /// Add a resolver configuration under `key`
    pub fn with_plugin_data(mut self, key: &str, value: Value) -> Self {
        self.plugin_data.insert(key.to_string(), value);
        self
    }

    pub fn identity(&self) -> ModIdentity {
        ModIdentity::new(self.mod_id.clone(), self.mod_name.clone())
    }

    /// Names of the update resolvers configured for this mod
    pub fn configured_resolvers(&self) -> Vec<&'static str> {
        RESOLVER_KEYS
            .iter()
            .copied()
            .filter(|key| matches!(self.plugin_data.get(*key), Some(Value::Object(_))))
            .collect()
    }

    /// Whether any update resolver is configured
    pub fn has_any_configured_resolver(&self) -> bool {
        !self.configured_resolvers().is_empty()
    }

    /// Read a single `ModConfig.json`
    pub fn load(path: &Path) -> Result<Self, ModConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ModConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // Files written by Windows tooling often carry a BOM
        let data = data.trim_start_matches('\u{feff}');

        let config: Self = serde_json::from_str(data).map_err(|source| ModConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.mod_id.trim().is_empty() {
            return Err(ModConfigError::MissingField {
                path: path.to_path_buf(),
                field: "ModId",
            });
        }
        if config.mod_name.trim().is_empty() {
            return Err(ModConfigError::MissingField {
                path: path.to_path_buf(),
                field: "ModName",
            });
        }
        Ok(config)
    }
}

/// Load every `<mods_dir>/<mod>/ModConfig.json`, sorted by mod id
///
/// Directories without a config are skipped; malformed configs are logged
/// and skipped so one broken mod does not block the rest.
pub fn load_mod_configs(mods_dir: &Path) -> Result<Vec<ModConfig>, ModConfigError> {
    let entries = std::fs::read_dir(mods_dir).map_err(|source| ModConfigError::Io {
        path: mods_dir.to_path_buf(),
        source,
    })?;

    let mut configs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ModConfigError::Io {
            path: mods_dir.to_path_buf(),
            source,
        })?;
        let config_path = entry.path().join(MOD_CONFIG_FILE);
        if !config_path.is_file() {
            continue;
        }

        match ModConfig::load(&config_path) {
            Ok(config) => {
                debug!("Loaded {} from {}", config.mod_id, config_path.display());
                configs.push(config);
            }
            Err(e) => warn!("Skipping mod: {}", e),
        }
    }

    configs.sort_by(|a, b| a.mod_id.cmp(&b.mod_id));
    Ok(configs)
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
