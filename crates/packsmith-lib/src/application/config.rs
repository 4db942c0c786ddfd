//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use crate::api::SearchOptions;
use crate::api::gamebanana::GAMEBANANA_BASE_URL;
use crate::api::nuget::NUGET_ORG_INDEX;
use crate::networking::NetworkingConfig;
use crate::primitives::*;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

/// Default configuration values
pub mod defaults {
    pub const LOG_LEVEL: &str = "1"; // Warnings and errors by default
    pub const LOG_FORMAT: &str = "text";
    pub const LOG_OUTPUT: &str = "stderr";
    pub const COLOR: &str = "auto";
    pub const NET_TIMEOUT: &str = "30";
    pub const MAX_RESULTS: &str = "50";
    pub const MAX_PROVIDERS: &str = "4";
}

/// Default value functions for configuration fields
mod default_fns {
    use super::*;

    pub fn log_level() -> u8 {
        1
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Stderr
    }

    pub fn color() -> ColorMode {
        ColorMode::Auto
    }

    pub fn net_timeout() -> u64 {
        30
    }

    pub fn max_results() -> usize {
        50
    }

    pub fn max_providers() -> usize {
        4
    }

    pub fn nuget_feeds() -> Vec<String> {
        vec![NUGET_ORG_INDEX.to_string()]
    }

    pub fn gamebanana_url() -> String {
        GAMEBANANA_BASE_URL.to_string()
    }
}

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Parser, Deserialize)]
pub struct AppConfig {
    /// Directory downloaded preview images are cached in
    #[arg(long, env = "PACKSMITH_CACHE_DIR")]
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// API timeout in seconds
    #[arg(short, long, env = "PACKSMITH_NET_TIMEOUT", default_value = defaults::NET_TIMEOUT)]
    #[serde(default = "default_fns::net_timeout")]
    pub net_timeout: u64,

    /// NuGet v3 feeds (service index or search endpoint), comma separated
    #[arg(
        long,
        env = "PACKSMITH_NUGET_FEEDS",
        value_delimiter = ',',
        default_value = NUGET_ORG_INDEX
    )]
    #[serde(default = "default_fns::nuget_feeds")]
    pub nuget_feeds: Vec<String>,

    /// GameBanana game id used to narrow searches
    #[arg(long, env = "PACKSMITH_GAMEBANANA_GAME")]
    #[serde(default)]
    pub gamebanana_game_id: Option<u64>,

    /// GameBanana base URL
    #[arg(long, env = "PACKSMITH_GAMEBANANA_URL", default_value = GAMEBANANA_BASE_URL, hide = true)]
    #[serde(default = "default_fns::gamebanana_url")]
    pub gamebanana_url: String,

    /// Maximum candidates requested from each provider
    #[arg(long, env = "PACKSMITH_MAX_RESULTS", default_value = defaults::MAX_RESULTS)]
    #[serde(default = "default_fns::max_results")]
    pub max_results: usize,

    /// Maximum feeds a single provider consults
    #[arg(long, env = "PACKSMITH_MAX_PROVIDERS", default_value = defaults::MAX_PROVIDERS)]
    #[serde(default = "default_fns::max_providers")]
    pub max_providers: usize,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, env = "PACKSMITH_LOG_LEVEL", default_value = defaults::LOG_LEVEL)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Log format (text, json, yaml)
    #[arg(long, env = "PACKSMITH_LOG_FORMAT", default_value = defaults::LOG_FORMAT)]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(long, env = "PACKSMITH_LOG_OUTPUT", default_value = defaults::LOG_OUTPUT)]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,

    /// Color output control (auto, always, never)
    #[arg(short, long, env = "PACKSMITH_COLOR", default_value = defaults::COLOR)]
    #[serde(default = "default_fns::color")]
    pub color: ColorMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            net_timeout: default_fns::net_timeout(),
            nuget_feeds: default_fns::nuget_feeds(),
            gamebanana_game_id: None,
            gamebanana_url: default_fns::gamebanana_url(),
            max_results: default_fns::max_results(),
            max_providers: default_fns::max_providers(),
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color(),
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig from AppConfig
    pub fn to_logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            ansi: self.color.use_ansi(),
        }
    }

    pub fn to_networking_config(&self) -> NetworkingConfig {
        NetworkingConfig {
            timeout_seconds: self.net_timeout,
            trace_requests: self.log_level >= 4,
            ..NetworkingConfig::default()
        }
    }

    /// Search options handed to every provider
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_results: self.max_results,
            max_providers: self.max_providers,
            ..SearchOptions::default()
        }
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        if other.cache_dir.is_some() {
            self.cache_dir = other.cache_dir;
        }
        if other.gamebanana_game_id.is_some() {
            self.gamebanana_game_id = other.gamebanana_game_id;
        }

        if other.net_timeout != default_fns::net_timeout() {
            self.net_timeout = other.net_timeout;
        }
        if other.nuget_feeds != default_fns::nuget_feeds() {
            self.nuget_feeds = other.nuget_feeds;
        }
        if other.gamebanana_url != default_fns::gamebanana_url() {
            self.gamebanana_url = other.gamebanana_url;
        }
        if other.max_results != default_fns::max_results() {
            self.max_results = other.max_results;
        }
        if other.max_providers != default_fns::max_providers() {
            self.max_providers = other.max_providers;
        }
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }

        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if !matches!(other.color, ColorMode::Auto) {
            self.color = other.color;
        }

        self
    }

    /// Validate the final configuration, resolving the cache directory
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.net_timeout == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "net-timeout must be at least 1 second".to_string(),
            });
        }
        if self.max_results == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "max-results must be at least 1".to_string(),
            });
        }

        self.nuget_feeds = self
            .nuget_feeds
            .iter()
            .map(|feed| feed.trim().to_string())
            .filter(|feed| !feed.is_empty())
            .collect();

        if self.cache_dir.is_none() {
            let dirs = directories::ProjectDirs::from("", "", "packsmith")
                .ok_or(ConfigError::NoCacheDir)?;
            self.cache_dir = Some(dirs.cache_dir().join("images"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
