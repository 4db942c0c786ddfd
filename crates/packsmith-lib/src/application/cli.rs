use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::config::AppConfig;

/// packsmith CLI - build mod packs from installed mods
#[derive(Debug, Clone, Parser)]
#[command(name = "packsmith")]
#[command(about = "Assemble shareable mod packs from installed mods")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// packsmith commands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available packsmith commands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Show version information
    Version,

    /// Build a pack archive from a directory of installed mods
    Create {
        /// Directory holding one sub-directory per mod
        #[arg(short, long, help = "Directory containing installed mods")]
        mods: PathBuf,

        /// Destination archive
        #[arg(short, long, help = "Path of the pack archive to write")]
        output: PathBuf,

        /// Pack name
        #[arg(short, long, help = "Name stored in the pack manifest")]
        name: Option<String>,

        /// Skip mods without an update resolver instead of aborting
        #[arg(short, long, help = "Leave out incompatible mods instead of failing")]
        force: bool,
    },

    /// Report mods that cannot be packed
    Validate {
        /// Directory holding one sub-directory per mod
        #[arg(short, long, help = "Directory containing installed mods")]
        mods: PathBuf,
    },

    /// Aggregate metadata for a single mod and print it as JSON
    Inspect {
        /// Mod id to look up
        #[arg(help = "Mod id, e.g. reloaded.sharedlib.hooks")]
        mod_id: String,

        /// Display name used by name-based providers
        #[arg(short, long, help = "Mod name (defaults to the id)")]
        name: Option<String>,
    },
}

impl Commands {
    /// Whether the command talks to remote providers
    pub fn requires_network(&self) -> bool {
        match self {
            Commands::Version => false,
            Commands::Validate { .. } => false,
            Commands::Create { .. } => true,
            Commands::Inspect { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
