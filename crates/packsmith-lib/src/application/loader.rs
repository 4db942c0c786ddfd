//! Configuration loading and global state management
//!
//! Coordinates loading configuration from various sources and provides
//! global application configuration access.

use crate::primitives::ConfigError;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use super::{config::AppConfig, env::EnvironmentConfig};

// Global configuration available throughout the application
static GLOBAL_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Env files read from the working directory, most specific first
pub const ENV_FILES: &[&str] = &[".env.local", ".env"];

/// Load `.env` files from `dir` into the process environment
///
/// Must run before CLI parsing so `PACKSMITH_*` bindings see the values.
/// Missing files are fine; unreadable or malformed ones are errors.
pub fn load_env_files(dir: &Path) -> Result<Vec<String>, ConfigError> {
    let mut loaded = Vec::new();
    for env_file in ENV_FILES {
        match dotenvy::from_path(dir.join(env_file)) {
            Ok(()) => loaded.push(env_file.to_string()),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(ConfigError::EnvFileError {
                    file: env_file.to_string(),
                    source: e,
                });
            }
        }
    }
    Ok(loaded)
}

impl AppConfig {
    /// Resolve the final config: defaults -> .env -> env vars -> CLI
    ///
    /// `.env` values and `PACKSMITH_*` variables already reach `cli_config`
    /// through clap's env bindings; this applies the standard color
    /// variables and validates.
    pub fn resolve(cli_config: AppConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(cli_config, EnvironmentConfig::load()?)
    }

    /// Resolve against an explicit environment
    pub fn resolve_with(cli_config: AppConfig, env: EnvironmentConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.color = env.apply_color_config(config.color);
        config = config.merge_with(cli_config);
        config.validate()?;

        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    /// Initialize global configuration (call once in main)
    pub fn init_global(config: AppConfig) -> Result<(), ConfigError> {
        GLOBAL_CONFIG
            .set(config)
            .map_err(|_| ConfigError::AlreadyInitialized)
    }

    /// Get global configuration reference, if initialized
    pub fn global() -> Option<&'static AppConfig> {
        GLOBAL_CONFIG.get()
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
