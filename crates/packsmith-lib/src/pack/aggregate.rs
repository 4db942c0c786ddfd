//! Best-effort metadata aggregation across package providers
//!
//! Every provider is asked about the mod once, in caller order. All returned
//! candidates are collected into one ordered list and then merged in two
//! passes:
//!
//! 1. General pass over every candidate: the largest image set wins (ties keep
//!    the earlier one), readme and summary take the first non-empty value.
//! 2. Highest-version pass over the candidates sharing the maximum version:
//!    their readme and summary override unconditionally, and their images
//!    override when they hold more than one image. A lone image is usually
//!    just a thumbnail, so it never replaces a richer set.

use crate::api::{
    DownloadableImage, ModIdentity, PackageCandidate, PackageProvider, ProviderError,
    SearchOptions,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Aggregation errors
///
/// Provider failures are absorbed; only cancellation escapes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Aggregation cancelled")]
    Cancelled,
}

/// Merged metadata for one mod
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub images: Option<Vec<DownloadableImage>>,
    pub markdown_readme: Option<String>,
    pub summary: Option<String>,
}

impl AggregatedResult {
    /// True when no provider contributed anything
    pub fn is_empty(&self) -> bool {
        self.images.is_none() && self.markdown_readme.is_none() && self.summary.is_none()
    }
}

/// Query every provider and merge their candidates
///
/// Cancellation is checked before each provider and raced against the
/// in-flight search; when it fires, collected work is dropped and
/// [`AggregateError::Cancelled`] is returned.
pub async fn aggregate(
    identity: &ModIdentity,
    providers: &[Arc<dyn PackageProvider>],
    options: &SearchOptions,
    cancel: &CancellationToken,
) -> Result<AggregatedResult, AggregateError> {
    let candidates = collect_candidates(identity, providers, options, cancel).await?;
    debug!(
        "Merging {} candidates from {} providers for {}",
        candidates.len(),
        providers.len(),
        identity
    );
    Ok(merge_candidates(&candidates))
}

/// Ask each provider in order, skipping failures
pub async fn collect_candidates(
    identity: &ModIdentity,
    providers: &[Arc<dyn PackageProvider>],
    options: &SearchOptions,
    cancel: &CancellationToken,
) -> Result<Vec<PackageCandidate>, AggregateError> {
    let mut candidates = Vec::new();

    for provider in providers {
        if cancel.is_cancelled() {
            return Err(AggregateError::Cancelled);
        }

        let search = provider.search_for_mod(identity, options, cancel);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AggregateError::Cancelled),
            result = search => result,
        };

        match result {
            Ok(found) => {
                debug!(
                    "Provider {} returned {} candidates for {}",
                    provider.name(),
                    found.len(),
                    identity
                );
                candidates.extend(found);
            }
            Err(ProviderError::Cancelled) => return Err(AggregateError::Cancelled),
            Err(e) => warn!(
                "Provider {} failed for {}, continuing: {}",
                provider.name(),
                identity,
                e
            ),
        }
    }

    if cancel.is_cancelled() {
        return Err(AggregateError::Cancelled);
    }
    Ok(candidates)
}

/// Pure two-pass merge over an ordered candidate list
pub fn merge_candidates(candidates: &[PackageCandidate]) -> AggregatedResult {
    let mut result = AggregatedResult::default();

    for candidate in candidates {
        if let Some(images) = &candidate.images {
            if adopt_images(result.images.as_deref(), images) {
                result.images = Some(images.clone());
            }
        }
        if result.markdown_readme.is_none() {
            result.markdown_readme = non_empty(&candidate.markdown_readme);
        }
        if result.summary.is_none() {
            result.summary = non_empty(&candidate.description);
        }
    }

    for candidate in highest_version_group(candidates) {
        if let Some(readme) = &candidate.markdown_readme {
            result.markdown_readme = Some(readme.clone());
        }
        if let Some(description) = &candidate.description {
            result.summary = Some(description.clone());
        }
        if let Some(images) = candidate.images.as_ref().filter(|images| images.len() > 1) {
            result.images = Some(images.clone());
        }
    }

    result
}

/// Whether `offered` should replace the images adopted so far
pub fn adopt_images(current: Option<&[DownloadableImage]>, offered: &[DownloadableImage]) -> bool {
    match current {
        None => true,
        Some(current) => offered.len() > current.len(),
    }
}

/// Candidates sharing the maximum version, in their original order
///
/// Unversioned candidates never belong to the group.
pub fn highest_version_group(candidates: &[PackageCandidate]) -> Vec<&PackageCandidate> {
    let Some(highest) = candidates.iter().filter_map(|c| c.version.as_ref()).max() else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter(|c| c.version.as_ref() == Some(highest))
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    include!("aggregate.test.rs");
}
