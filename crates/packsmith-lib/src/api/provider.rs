//! Package provider abstraction
//!
//! A provider answers "which published packages look like this mod?" with a
//! list of [`PackageCandidate`]s. Providers are consulted in caller order by
//! the aggregator, so the trait is object safe and providers are held as
//! `Arc<dyn PackageProvider>`.

use super::version::PackageVersion;
use crate::networking::NetworkingError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Default number of candidates requested from each provider
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Default number of sources (feeds) a single provider may consult
pub const DEFAULT_MAX_PROVIDERS: usize = 4;

/// Provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: NetworkingError,
    },

    #[error("Provider '{provider}' is misconfigured: {reason}")]
    Misconfigured { provider: String, reason: String },

    #[error("Provider '{provider}' failed: {message}")]
    Failed { provider: String, message: String },

    #[error("Search cancelled")]
    Cancelled,
}

/// Identity of the mod being searched for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModIdentity {
    pub id: String,
    pub name: String,
}

impl ModIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ModIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Remote image advertised by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadableImage {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl DownloadableImage {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// One provider's metadata proposal for a mod
///
/// `images` distinguishes "no image information" (`None`) from "known to have
/// no images" (`Some(vec![])`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageCandidate {
    pub version: Option<PackageVersion>,
    pub images: Option<Vec<DownloadableImage>>,
    pub markdown_readme: Option<String>,
    pub description: Option<String>,
}

/// Knobs passed verbatim to every provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Upper bound on candidates returned by one provider
    pub max_results: usize,
    /// Upper bound on sources (feeds) one provider may consult
    pub max_providers: usize,
    /// Only report the newest version of each matching package
    pub only_best_version: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            max_providers: DEFAULT_MAX_PROVIDERS,
            only_best_version: true,
        }
    }
}

/// Source of package candidates
#[async_trait]
pub trait PackageProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Search for packages matching the given mod
    ///
    /// May return an empty list. Ordering is provider-defined.
    async fn search_for_mod(
        &self,
        identity: &ModIdentity,
        options: &SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageCandidate>, ProviderError>;
}

/// Canned response for [`StaticPackageProvider`]
#[derive(Debug, Clone)]
enum StaticResponse {
    Candidates(Vec<PackageCandidate>),
    Failure(String),
}

/// In-memory provider keyed by mod id
///
/// Unknown ids yield an empty result. Useful for tests and for seeding
/// metadata that no remote source carries.
#[derive(Debug, Clone)]
pub struct StaticPackageProvider {
    name: String,
    responses: HashMap<String, StaticResponse>,
}

impl StaticPackageProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: HashMap::new(),
        }
    }

    /// Register candidates returned for `mod_id`
    pub fn with_candidates(mut self, mod_id: &str, candidates: Vec<PackageCandidate>) -> Self {
        self.responses
            .insert(mod_id.to_string(), StaticResponse::Candidates(candidates));
        self
    }

    /// Make searches for `mod_id` fail with `message`
    pub fn with_failure(mut self, mod_id: &str, message: &str) -> Self {
        self.responses
            .insert(mod_id.to_string(), StaticResponse::Failure(message.to_string()));
        self
    }
}

#[async_trait]
impl PackageProvider for StaticPackageProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search_for_mod(
        &self,
        identity: &ModIdentity,
        options: &SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageCandidate>, ProviderError> {
        if cancel.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }

        match self.responses.get(&identity.id) {
            Some(StaticResponse::Candidates(candidates)) => Ok(candidates
                .iter()
                .take(options.max_results)
                .cloned()
                .collect()),
            Some(StaticResponse::Failure(message)) => Err(ProviderError::Failed {
                provider: self.name.clone(),
                message: message.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    include!("provider.test.rs");
}
