//! NuGet v3 feed provider
//!
//! Mods published as NuGet packages are looked up through the feed's search
//! service. Feeds may be given either as a search endpoint or as a v3 service
//! index (`.../index.json`), in which case the `SearchQueryService` resource is
//! resolved once and remembered.

use super::encode_component;
use super::provider::{
    DownloadableImage, ModIdentity, PackageCandidate, PackageProvider, ProviderError,
    SearchOptions,
};
use super::version::PackageVersion;
use crate::networking::{NetworkingError, NetworkingManager};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Public nuget.org service index
pub const NUGET_ORG_INDEX: &str = "https://api.nuget.org/v3/index.json";

/// Search response from a NuGet v3 search service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub total_hits: u64,
    pub data: Vec<SearchHit>,
}

/// One package in a NuGet search response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

/// Listed version of a package
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub version: String,
    #[serde(default)]
    pub downloads: u64,
}

/// v3 service index document
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceIndex {
    pub resources: Vec<ServiceResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceResource {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
}

/// Provider backed by one or more NuGet v3 feeds
pub struct NuGetProvider {
    networking: NetworkingManager,
    feeds: Vec<String>,
    resolved: Mutex<HashMap<String, String>>,
}

impl NuGetProvider {
    /// Create a provider over `feeds`, consulted in order
    pub fn new(networking: NetworkingManager, feeds: Vec<String>) -> Self {
        Self {
            networking,
            feeds,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// Turn a configured feed into its search endpoint
    async fn search_endpoint(
        &self,
        feed: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        if !feed.ends_with("index.json") {
            return Ok(feed.trim_end_matches('/').to_string());
        }

        if let Some(endpoint) = self.resolved.lock().await.get(feed) {
            return Ok(endpoint.clone());
        }

        let index: ServiceIndex = self.networking.get_json(feed, cancel).await?;
        let endpoint = index
            .resources
            .into_iter()
            .find(|resource| resource.kind.starts_with("SearchQueryService"))
            .map(|resource| resource.id)
            .ok_or_else(|| ProviderError::Misconfigured {
                provider: self.name().to_string(),
                reason: format!("{feed} has no SearchQueryService"),
            })?;

        debug!("Resolved NuGet search endpoint {} -> {}", feed, endpoint);
        self.resolved
            .lock()
            .await
            .insert(feed.to_string(), endpoint.clone());
        Ok(endpoint)
    }

    async fn search_feed(
        &self,
        feed: &str,
        identity: &ModIdentity,
        options: &SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageCandidate>, ProviderError> {
        let endpoint = self.search_endpoint(feed, cancel).await?;
        let url = format!(
            "{}?q={}&take={}&prerelease=true&semVerLevel=2.0.0",
            endpoint,
            encode_component(&identity.id),
            options.max_results
        );

        let response: SearchResponse = self.networking.get_json(&url, cancel).await?;
        debug!(
            "NuGet feed {} returned {} of {} hits for {}",
            feed,
            response.data.len(),
            response.total_hits,
            identity.id
        );

        Ok(response
            .data
            .iter()
            .filter(|hit| hit.id.eq_ignore_ascii_case(&identity.id))
            .flat_map(|hit| hit_to_candidates(hit, options.only_best_version))
            .collect())
    }
}

/// Convert a search hit into one candidate per reported version
pub fn hit_to_candidates(hit: &SearchHit, only_best_version: bool) -> Vec<PackageCandidate> {
    let images = hit
        .icon_url
        .as_ref()
        .filter(|url| !url.is_empty())
        .map(|url| vec![DownloadableImage::new(url.clone())]);
    let description = hit
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .or_else(|| hit.summary.clone().filter(|s| !s.trim().is_empty()));

    let candidate = |version: &str| PackageCandidate {
        version: PackageVersion::parse_lenient(version),
        images: images.clone(),
        markdown_readme: None,
        description: description.clone(),
    };

    if only_best_version || hit.versions.is_empty() {
        return vec![candidate(&hit.version)];
    }
    hit.versions
        .iter()
        .map(|entry| candidate(&entry.version))
        .collect()
}

#[async_trait]
impl PackageProvider for NuGetProvider {
    fn name(&self) -> &str {
        "nuget"
    }

    async fn search_for_mod(
        &self,
        identity: &ModIdentity,
        options: &SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageCandidate>, ProviderError> {
        if self.feeds.is_empty() {
            return Err(ProviderError::Misconfigured {
                provider: self.name().to_string(),
                reason: "no feeds configured".to_string(),
            });
        }

        let mut candidates = Vec::new();
        let mut last_error = None;
        let mut succeeded = 0usize;

        for feed in self.feeds.iter().take(options.max_providers.max(1)) {
            match self.search_feed(feed, identity, options, cancel).await {
                Ok(found) => {
                    succeeded += 1;
                    candidates.extend(found);
                }
                Err(ProviderError::Network {
                    source: NetworkingError::Cancelled { .. },
                })
                | Err(ProviderError::Cancelled) => return Err(ProviderError::Cancelled),
                Err(e) => {
                    warn!("NuGet feed {} failed: {}", feed, e);
                    last_error = Some(e);
                }
            }
        }

        match (succeeded, last_error) {
            (0, Some(e)) => Err(e),
            _ => {
                candidates.truncate(options.max_results);
                Ok(candidates)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    include!("nuget.test.rs");
}
