//! Image conversion seam used when packing downloaded previews

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension assumed when neither the URI nor the file name carries one
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to read image '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Bytes ready to be stored in a pack, with the extension to store them under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedImage {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// Converts a downloaded image into the format stored inside packs
pub trait ImageConverter: Send + Sync {
    /// `source_extension` is the extension the image was published with,
    /// which may differ from the cached file's name
    fn convert(&self, file: &Path, source_extension: &str) -> Result<ConvertedImage, ImageError>;
}

/// Lower-case, strip any leading dot, and fall back to [`DEFAULT_IMAGE_EXTENSION`]
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        DEFAULT_IMAGE_EXTENSION.to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

/// Stores images exactly as downloaded
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughConverter;

impl ImageConverter for PassthroughConverter {
    fn convert(&self, file: &Path, source_extension: &str) -> Result<ConvertedImage, ImageError> {
        let bytes = std::fs::read(file).map_err(|source| ImageError::Read {
            path: file.to_path_buf(),
            source,
        })?;

        Ok(ConvertedImage {
            bytes,
            extension: normalize_extension(source_extension),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(".PNG"), "png");
        assert_eq!(normalize_extension("webp"), "webp");
        assert_eq!(normalize_extension(""), "png");
        assert_eq!(normalize_extension(" . "), "png");
    }

    #[test]
    fn test_passthrough_keeps_bytes() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("cached");
        std::fs::write(&file, b"GIF89a").unwrap();

        let converted = PassthroughConverter.convert(&file, ".GIF").unwrap();
        assert_eq!(converted.bytes, b"GIF89a");
        assert_eq!(converted.extension, "gif");
    }

    #[test]
    fn test_passthrough_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = PassthroughConverter.convert(&dir.path().join("missing.png"), "png");
        assert!(matches!(result, Err(ImageError::Read { .. })));
    }
}
