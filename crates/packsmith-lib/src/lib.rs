//! # packsmith Library
//!
//! Builds shareable mod packs from a directory of installed mods, filling in
//! previews, readmes and summaries from remote package providers.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Foundation types and shared errors
//! - [`logger`] - Structured logging with progress tracking
//! - [`networking`] - HTTP client and on-disk image cache
//! - [`api`] - Package providers (NuGet, GameBanana) and versions
//! - [`pack`] - Mod configs, metadata aggregation, pack archives
//! - [`display`] - User-facing status output
//! - [`application`] - CLI interface and configuration management
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! packsmith_lib::main().await
//! # }
//! ```

pub mod api;
pub mod application;
pub mod display;
pub mod logger;
pub mod networking;
pub mod pack;
pub mod primitives;

// Re-export commonly used types for convenience
pub use api::{ModIdentity, PackageCandidate, PackageProvider, PackageVersion, SearchOptions};
pub use application::{AppConfig, Cli, CommandSession, Commands, execute_command};
pub use logger::Logger;
pub use networking::{ImageCache, NetworkingConfig, NetworkingManager};
pub use pack::{AggregatedResult, AutoPackCreator, PackBuilder, aggregate};
pub use primitives::{ConfigError, LogFormat, LogLevel, LogOutput, LoggerError};

// Private imports for the main function
use anyhow::{Context, Result};
use clap::Parser;

pub async fn main() -> Result<()> {
    // .env values must be in the environment before clap reads env bindings
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    application::load_env_files(&cwd)?;

    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.config)?;

    Logger::init(config.to_logger_config())?;
    AppConfig::init_global(config.clone())?;

    let session = CommandSession::new(config);
    execute_command(cli.command, &session).await
}
