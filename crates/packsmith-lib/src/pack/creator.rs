//! Automatic pack creation from installed mods
//!
//! For every mod the creator aggregates metadata from the configured
//! providers, downloads and converts the preview images, and records the
//! result as one item of a [`PackBuilder`].

use super::aggregate::{AggregateError, aggregate};
use super::builder::{PackBuilder, PackItemBuilder};
use super::config::ModConfig;
use super::image::{DEFAULT_IMAGE_EXTENSION, ImageConverter, ImageError};
use crate::api::{DownloadableImage, PackageProvider, SearchOptions};
use crate::networking::cache::{CacheError, ImageCache, MOD_PREVIEW_EXPIRATION, extension_from_uri};
use crate::primitives::LogContext;
use crate::progress_span;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, warn};
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// Name given to packs that were never named by the user
pub const DEFAULT_PACK_NAME: &str = "My Autogenerated Package";

/// Readme placeholder for generated packs
pub const DEFAULT_PACK_README: &str = "You should probably add description here.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreateError {
    #[error("Pack creation cancelled")]
    Cancelled,
}

/// Why a single image could not be added
#[derive(Debug, Error)]
enum FetchError {
    #[error("{source}")]
    Cache {
        #[from]
        source: CacheError,
    },

    #[error("{source}")]
    Convert {
        #[from]
        source: ImageError,
    },
}

impl From<AggregateError> for CreateError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::Cancelled => CreateError::Cancelled,
        }
    }
}

/// True when the mod declares at least one update resolver
pub fn can_create(config: &ModConfig) -> bool {
    config.has_any_configured_resolver()
}

/// Check every mod, returning the incompatible ones on failure
pub fn validate_can_create(configs: &[ModConfig]) -> Result<(), Vec<ModConfig>> {
    let incompatible: Vec<ModConfig> = configs
        .iter()
        .filter(|config| !can_create(config))
        .cloned()
        .collect();

    if incompatible.is_empty() {
        Ok(())
    } else {
        Err(incompatible)
    }
}

/// Builds packs by querying providers for each mod
pub struct AutoPackCreator {
    providers: Vec<Arc<dyn PackageProvider>>,
    converter: Arc<dyn ImageConverter>,
    cache: ImageCache,
    options: SearchOptions,
}

impl AutoPackCreator {
    pub fn new(
        providers: Vec<Arc<dyn PackageProvider>>,
        converter: Arc<dyn ImageConverter>,
        cache: ImageCache,
    ) -> Self {
        Self {
            providers,
            converter,
            cache,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Create a pack with one item per config, in order
    pub async fn create(
        &self,
        configs: &[ModConfig],
        cancel: &CancellationToken,
    ) -> Result<PackBuilder, CreateError> {
        let span = progress_span!("Creating pack", total = configs.len() as u64);
        span.pb_set_length(configs.len() as u64);

        async {
            let mut builder = PackBuilder::new();
            builder
                .set_name(DEFAULT_PACK_NAME)
                .set_readme(DEFAULT_PACK_README);

            for config in configs {
                if cancel.is_cancelled() {
                    return Err(CreateError::Cancelled);
                }
                self.create_mod(&mut builder, config, cancel).await?;
                Span::current().pb_inc(1);
            }
            Ok(builder)
        }
        .instrument(span)
        .await
    }

    /// Add one mod to `builder` with whatever metadata the providers know
    pub async fn create_mod(
        &self,
        builder: &mut PackBuilder,
        config: &ModConfig,
        cancel: &CancellationToken,
    ) -> Result<(), CreateError> {
        let identity = config.identity();
        let result = aggregate(&identity, &self.providers, &self.options, cancel).await?;
        if result.is_empty() {
            debug!("No provider knew anything about {}", identity);
        }

        let item = builder.add_mod_item(&config.mod_id);
        item.set_name(&config.mod_name)
            .set_plugin_data(config.plugin_data.clone());

        let images = result.images.unwrap_or_default();
        let total = images.len();
        for (index, image) in images.iter().enumerate() {
            match self.fetch_image(item, image, cancel).await {
                Ok(()) => {}
                Err(FetchError::Cache {
                    source: CacheError::Cancelled,
                }) => return Err(CreateError::Cancelled),
                Err(e) => {
                    let mut context = LogContext::with_progress("fetch image", total as u64);
                    context.set_progress(index as u64 + 1);
                    let message = format!("Skipping image {} for {}: {}", image.uri, identity, e);
                    match crate::logger::Logger::global() {
                        Some(logger) => logger.warn(&message, Some(context)),
                        None => warn!("{}", message),
                    }
                }
            }
        }

        if let Some(readme) = result.markdown_readme.as_deref().filter(|s| !s.is_empty()) {
            item.set_readme(readme);
        }
        if let Some(summary) = result.summary.as_deref().filter(|s| !s.is_empty()) {
            item.set_summary(summary);
        }

        debug!("Added {} with {} images", identity, item.image_count());
        Ok(())
    }

    async fn fetch_image(
        &self,
        item: &mut PackItemBuilder,
        image: &DownloadableImage,
        cancel: &CancellationToken,
    ) -> Result<(), FetchError> {
        let path = self
            .cache
            .get_or_download(&image.uri, MOD_PREVIEW_EXPIRATION, false, cancel)
            .await?;

        let extension =
            extension_from_uri(&image.uri).unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string());
        let converted = self.converter.convert(&path, &extension)?;

        item.add_image(converted.bytes, &converted.extension, image.caption.as_deref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("creator.test.rs");
}
