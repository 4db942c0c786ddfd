use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::{NetworkingError, NetworkingManager};

/// How long downloaded mod preview images stay valid - 7 days
pub const MOD_PREVIEW_EXPIRATION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Image cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Download failed: {source}")]
    Download {
        #[from]
        source: NetworkingError,
    },

    #[error("Download cancelled")]
    Cancelled,
}

/// On-disk cache of remote files keyed by the SHA-256 of their URI
#[derive(Debug, Clone)]
pub struct ImageCache {
    networking: NetworkingManager,
    cache_dir: PathBuf,
}

/// Lower-cased file extension of the last path segment of `uri`, if any
pub fn extension_from_uri(uri: &str) -> Option<String> {
    let without_suffix = uri.split(['?', '#']).next().unwrap_or(uri);
    let segment = without_suffix.rsplit('/').next()?;
    let ext = Path::new(segment).extension()?.to_str()?;

    if ext.is_empty() || ext.len() > 5 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

impl ImageCache {
    /// Create a cache rooted at `cache_dir` (created lazily)
    pub fn new(networking: NetworkingManager, cache_dir: PathBuf) -> Self {
        Self {
            networking,
            cache_dir,
        }
    }

    /// Get cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Location a given URI is cached at
    pub fn path_for(&self, uri: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(uri.as_bytes());
        let mut name = format!("{:x}", hasher.finalize());
        if let Some(ext) = extension_from_uri(uri) {
            name.push('.');
            name.push_str(&ext);
        }
        self.cache_dir.join(name)
    }

    /// Return the local file for `uri`, downloading it when missing or stale
    ///
    /// A cached file whose modification time is within `expiration` is reused
    /// unless `force_refresh` is set.
    pub async fn get_or_download(
        &self,
        uri: &str,
        expiration: Duration,
        force_refresh: bool,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, CacheError> {
        if cancel.is_cancelled() {
            return Err(CacheError::Cancelled);
        }

        let path = self.path_for(uri);
        if !force_refresh && is_fresh(&path, expiration).await {
            trace!("Cache hit for {}", uri);
            return Ok(path);
        }

        debug!("Downloading {} -> {}", uri, path.display());
        let data = match self.networking.get_bytes(uri, cancel).await {
            Ok(data) => data,
            Err(NetworkingError::Cancelled { .. }) => return Err(CacheError::Cancelled),
            Err(e) => return Err(e.into()),
        };

        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|source| CacheError::Io {
                path: self.cache_dir.clone(),
                source,
            })?;

        // Write then rename so a concurrent reader never sees a partial file
        let partial = path.with_extension("part");
        tokio::fs::write(&partial, &data)
            .await
            .map_err(|source| CacheError::Io {
                path: partial.clone(),
                source,
            })?;
        tokio::fs::rename(&partial, &path)
            .await
            .map_err(|source| CacheError::Io {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

async fn is_fresh(path: &Path, expiration: Duration) -> bool {
    let Ok(metadata) = tokio::fs::metadata(path).await else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    // A timestamp in the future (clock skew) counts as stale
    SystemTime::now()
        .duration_since(modified)
        .is_ok_and(|age| age < expiration)
}

#[cfg(test)]
mod tests {
    include!("cache.test.rs");
}
