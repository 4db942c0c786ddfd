//! GameBanana provider
//!
//! Uses the public apiv11 search. GameBanana is the richest source of preview
//! screenshots, but its records carry only a short description and no
//! markdown readme.

use super::encode_component;
use super::provider::{
    DownloadableImage, ModIdentity, PackageCandidate, PackageProvider, ProviderError,
    SearchOptions,
};
use super::version::PackageVersion;
use crate::networking::{NetworkingError, NetworkingManager};
use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Public GameBanana API root
pub const GAMEBANANA_BASE_URL: &str = "https://gamebanana.com";

/// Search response from `apiv11/Util/Search/Results`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    #[serde(rename = "_aRecords", default)]
    pub records: Vec<Record>,
}

/// One submission in a search response
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    #[serde(rename = "_idRow")]
    pub id: u64,
    #[serde(rename = "_sName")]
    pub name: String,
    #[serde(rename = "_sVersion", default)]
    pub version: Option<String>,
    #[serde(rename = "_sDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "_aPreviewMedia", default)]
    pub preview_media: Option<PreviewMedia>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewMedia {
    #[serde(rename = "_aImages", default)]
    pub images: Vec<PreviewImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewImage {
    #[serde(rename = "_sBaseUrl")]
    pub base_url: String,
    #[serde(rename = "_sFile")]
    pub file: String,
    #[serde(rename = "_sCaption", default)]
    pub caption: Option<String>,
}

impl PreviewImage {
    pub fn to_image(&self) -> DownloadableImage {
        let uri = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.file.trim_start_matches('/')
        );
        DownloadableImage {
            uri,
            caption: self.caption.clone().filter(|c| !c.trim().is_empty()),
        }
    }
}

impl Record {
    /// Convert into a candidate, decoding HTML entities in the description
    pub fn to_candidate(&self) -> PackageCandidate {
        let images = self
            .preview_media
            .as_ref()
            .map(|media| media.images.iter().map(PreviewImage::to_image).collect());
        let description = self
            .description
            .as_deref()
            .map(|d| html_escape::decode_html_entities(d.trim()).into_owned())
            .filter(|d| !d.is_empty());

        PackageCandidate {
            version: self.version.as_deref().and_then(PackageVersion::parse_lenient),
            images,
            markdown_readme: None,
            description,
        }
    }
}

/// Provider backed by GameBanana's search
pub struct GameBananaProvider {
    networking: NetworkingManager,
    base_url: String,
    game_id: Option<u64>,
}

impl GameBananaProvider {
    /// Create provider against the public site, optionally scoped to one game
    pub fn new(networking: NetworkingManager, game_id: Option<u64>) -> Self {
        Self::with_base_url(networking, GAMEBANANA_BASE_URL.to_string(), game_id)
    }

    /// Create provider with custom base URL (for mirrors/testing)
    pub fn with_base_url(
        networking: NetworkingManager,
        base_url: String,
        game_id: Option<u64>,
    ) -> Self {
        Self {
            networking,
            base_url: base_url.trim_end_matches('/').to_string(),
            game_id,
        }
    }

    fn search_url(&self, name: &str, per_page: usize) -> String {
        let mut url = format!(
            "{}/apiv11/Util/Search/Results?_sModelName=Mod&_sOrder=best_match&_sSearchString={}&_nPerpage={}",
            self.base_url,
            encode_component(name),
            per_page
        );
        if let Some(game_id) = self.game_id {
            url.push_str(&format!("&_idGameRow={game_id}"));
        }
        url
    }
}

#[async_trait]
impl PackageProvider for GameBananaProvider {
    fn name(&self) -> &str {
        "gamebanana"
    }

    async fn search_for_mod(
        &self,
        identity: &ModIdentity,
        options: &SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<PackageCandidate>, ProviderError> {
        // GameBanana caps page size at 50
        let url = self.search_url(&identity.name, options.max_results.clamp(1, 50));

        let results: SearchResults = match self.networking.get_json(&url, cancel).await {
            Ok(results) => results,
            Err(NetworkingError::Cancelled { .. }) => return Err(ProviderError::Cancelled),
            Err(e) => return Err(e.into()),
        };

        let candidates: Vec<PackageCandidate> = results
            .records
            .iter()
            .filter(|record| record.name.trim().eq_ignore_ascii_case(identity.name.trim()))
            .take(options.max_results)
            .map(Record::to_candidate)
            .collect();

        debug!(
            "GameBanana matched {} of {} records for '{}'",
            candidates.len(),
            results.records.len(),
            identity.name
        );
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    include!("gamebanana.test.rs");
}
