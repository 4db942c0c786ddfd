//! Command execution handlers
//!
//! Each handler receives a [`CommandSession`] owning the resolved config,
//! the user-facing display and the cancellation token for the run.

use crate::api::{GameBananaProvider, ModIdentity, NuGetProvider, PackageProvider};
use crate::application::{AppConfig, Commands};
use crate::display::Display;
use crate::networking::{ImageCache, NetworkingManager};
use crate::pack::{
    AutoPackCreator, ModConfig, PassthroughConverter, aggregate, can_create, load_mod_configs,
    validate_can_create,
};
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// State shared by one command invocation
pub struct CommandSession {
    config: AppConfig,
    display: Display,
    cancel: CancellationToken,
}

impl CommandSession {
    /// Session printing to stdout, cancelled on Ctrl-C
    pub fn new(config: AppConfig) -> Self {
        let display = Display::stdout(config.color);
        let session = Self::with_display(config, display);
        session.cancel_on_ctrl_c();
        session
    }

    /// Session with an explicit display and a fresh token
    pub fn with_display(config: AppConfig, display: Display) -> Self {
        Self {
            config,
            display,
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    fn cancel_on_ctrl_c(&self) {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted, cancelling");
                cancel.cancel();
            }
        });
    }

    /// Providers in query order: NuGet feeds first, then GameBanana
    pub fn providers(&self) -> Result<Vec<Arc<dyn PackageProvider>>> {
        let networking = self.networking()?;
        let mut providers: Vec<Arc<dyn PackageProvider>> = Vec::new();

        if !self.config.nuget_feeds.is_empty() {
            providers.push(Arc::new(NuGetProvider::new(
                networking.clone(),
                self.config.nuget_feeds.clone(),
            )));
        }
        providers.push(Arc::new(GameBananaProvider::with_base_url(
            networking,
            self.config.gamebanana_url.clone(),
            self.config.gamebanana_game_id,
        )));

        Ok(providers)
    }

    fn networking(&self) -> Result<NetworkingManager> {
        NetworkingManager::new(self.config.to_networking_config())
            .context("Failed to build HTTP client")
    }

    fn image_cache(&self) -> Result<ImageCache> {
        let cache_dir = self
            .config
            .cache_dir
            .clone()
            .context("No cache directory configured")?;
        Ok(ImageCache::new(self.networking()?, cache_dir))
    }
}

/// Execute a parsed command; no command prints a short usage hint
pub async fn execute_command(command: Option<Commands>, session: &CommandSession) -> Result<()> {
    let Some(command) = command else {
        session
            .display()
            .status()
            .message("packsmith - mod pack builder");
        session
            .display()
            .status()
            .subtle("Run 'packsmith --help' for usage information");
        return Ok(());
    };

    debug!("Executing {:?}", command);
    match command {
        Commands::Version => handle_version(session),
        Commands::Validate { mods } => handle_validate(session, &mods),
        Commands::Create {
            mods,
            output,
            name,
            force,
        } => handle_create(session, &mods, &output, name.as_deref(), force).await,
        Commands::Inspect { mod_id, name } => {
            handle_inspect(session, &mod_id, name.as_deref()).await
        }
    }
}

fn handle_version(session: &CommandSession) -> Result<()> {
    let status = session.display().status();
    status.emphasis(&format!("packsmith {}", env!("CARGO_PKG_VERSION")));
    status.message("Assemble shareable mod packs from installed mods");
    status.message("");
    status.properties(&[
        (
            "Built from commit",
            option_env!("GIT_HASH").unwrap_or("unknown"),
        ),
        ("Target", std::env::consts::ARCH),
    ]);
    Ok(())
}

fn load_configs(mods: &Path) -> Result<Vec<ModConfig>> {
    let configs = load_mod_configs(mods)
        .with_context(|| format!("Failed to read mods from {}", mods.display()))?;
    if configs.is_empty() {
        bail!("No mods found in {}", mods.display());
    }
    Ok(configs)
}

fn report_incompatible(session: &CommandSession, incompatible: &[ModConfig]) {
    let status = session.display().status();
    for config in incompatible {
        status.error(
            &config.mod_id,
            "no update resolver configured (GitHubRelease, GameBanana or NuGet)",
        );
    }
}

fn handle_validate(session: &CommandSession, mods: &Path) -> Result<()> {
    let configs = load_configs(mods)?;

    match validate_can_create(&configs) {
        Ok(()) => {
            session
                .display()
                .status()
                .success(&format!("{} mods", configs.len()), "ready to pack");
            Ok(())
        }
        Err(incompatible) => {
            report_incompatible(session, &incompatible);
            bail!(
                "{} of {} mods cannot be packed",
                incompatible.len(),
                configs.len()
            )
        }
    }
}

async fn handle_create(
    session: &CommandSession,
    mods: &Path,
    output: &Path,
    name: Option<&str>,
    force: bool,
) -> Result<()> {
    let mut configs = load_configs(mods)?;

    if let Err(incompatible) = validate_can_create(&configs) {
        report_incompatible(session, &incompatible);
        if !force {
            bail!(
                "{} mods cannot be packed; fix them or pass --force to leave them out",
                incompatible.len()
            );
        }
        session.display().status().warning(&format!(
            "Leaving out {} incompatible mods",
            incompatible.len()
        ));
        configs.retain(can_create);
        if configs.is_empty() {
            bail!("No packable mods left in {}", mods.display());
        }
    }

    let creator = AutoPackCreator::new(
        session.providers()?,
        Arc::new(PassthroughConverter),
        session.image_cache()?,
    )
    .with_options(session.config().search_options());

    let mut builder = creator
        .create(&configs, session.cancellation())
        .await
        .context("Pack creation stopped")?;
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        builder.set_name(name);
    }

    let manifest = builder
        .write_to_path(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let image_count: usize = manifest.items.iter().map(|item| item.images.len()).sum();
    session.display().status().success(
        &output.display().to_string(),
        &format!("{} mods, {} images", manifest.items.len(), image_count),
    );
    Ok(())
}

async fn handle_inspect(session: &CommandSession, mod_id: &str, name: Option<&str>) -> Result<()> {
    let identity = ModIdentity::new(mod_id, name.unwrap_or(mod_id));
    let providers = session.providers()?;

    let result = aggregate(
        &identity,
        &providers,
        &session.config().search_options(),
        session.cancellation(),
    )
    .await
    .with_context(|| format!("Lookup of {} stopped", identity))?;

    // Warnings stay on the log stream so stdout is pure JSON
    if result.is_empty() {
        warn!("No provider knows {}", identity);
    }
    let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
    session.display().write_line(&json);
    Ok(())
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
