//! Isolated on-disk environment for end-to-end runs

use anyhow::{Context, Result};
use packsmith_lib::AppConfig;
use packsmith_lib::pack::ModConfig;
use packsmith_lib::pack::config::MOD_CONFIG_FILE;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory holding a mods folder, an image cache and outputs
pub struct TestEnvironment {
    root: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let root = TempDir::new().context("Failed to create test directory")?;
        std::fs::create_dir_all(root.path().join("Mods"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.root.path().join("Mods")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.path().join("cache")
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.root.path().join("out").join(name)
    }

    /// Install a mod as `<Mods>/<mod id>/ModConfig.json`
    pub fn install_mod(&self, config: &ModConfig) -> Result<PathBuf> {
        let dir = self.mods_dir().join(&config.mod_id);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(MOD_CONFIG_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(config)?)?;
        Ok(path)
    }

    /// Config pointing every provider at `server_url` and the cache here
    pub fn app_config(&self, server_url: &str) -> AppConfig {
        AppConfig {
            cache_dir: Some(self.cache_dir()),
            nuget_feeds: vec![format!("{server_url}/v3/index.json")],
            gamebanana_url: server_url.to_string(),
            ..AppConfig::default()
        }
    }
}
