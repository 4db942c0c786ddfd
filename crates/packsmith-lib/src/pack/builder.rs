//! Pack archive builder
//!
//! A pack is a zip archive holding a `pack.json` manifest plus every image it
//! references. Pack-level images live under `images/`, item images under
//! `items/<mod id>/`; manifest paths always use forward slashes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Manifest file name inside a pack archive
pub const MANIFEST_FILE: &str = "pack.json";

/// Pack build errors
#[derive(Debug, Error)]
pub enum PackError {
    #[error("Pack I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Archive write failed: {source}")]
    Archive {
        #[from]
        source: zip::result::ZipError,
    },

    #[error("Manifest serialization failed: {source}")]
    Manifest {
        #[from]
        source: serde_json::Error,
    },

    #[error("Pack name must not be empty")]
    EmptyName,

    #[error("Mod '{mod_id}' was added to the pack twice")]
    DuplicateItem { mod_id: String },
}

/// Image entry in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackImage {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// One mod inside the pack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackItem {
    pub mod_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub images: Vec<PackImage>,
    #[serde(default)]
    pub plugin_data: Map<String, Value>,
}

/// Contents of `pack.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackManifest {
    pub name: String,
    pub readme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub images: Vec<PackImage>,
    #[serde(default)]
    pub items: Vec<PackItem>,
}

impl PackManifest {
    /// Read the manifest back out of a pack archive
    pub fn read_from_archive<R: Read + Seek>(reader: R) -> Result<Self, PackError> {
        let mut archive = ZipArchive::new(reader)?;
        let mut file = archive.by_name(MANIFEST_FILE)?;
        let mut data = String::new();
        file.read_to_string(&mut data)
            .map_err(|source| PackError::Io {
                path: PathBuf::from(MANIFEST_FILE),
                source,
            })?;
        Ok(serde_json::from_str(&data)?)
    }
}

/// Image bytes waiting to be written
#[derive(Debug, Clone)]
struct PendingImage {
    bytes: Vec<u8>,
    extension: String,
    caption: Option<String>,
}

impl PendingImage {
    fn new(bytes: Vec<u8>, extension: &str, caption: Option<String>) -> Self {
        Self {
            bytes,
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
            caption,
        }
    }
}

/// Builder for one mod entry
#[derive(Debug, Clone)]
pub struct PackItemBuilder {
    mod_id: String,
    name: String,
    readme: Option<String>,
    summary: Option<String>,
    plugin_data: Map<String, Value>,
    images: Vec<PendingImage>,
}

impl PackItemBuilder {
    fn new(mod_id: &str) -> Self {
        Self {
            mod_id: mod_id.to_string(),
            name: mod_id.to_string(),
            readme: None,
            summary: None,
            plugin_data: Map::new(),
            images: Vec::new(),
        }
    }

    pub fn mod_id(&self) -> &str {
        &self.mod_id
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }

    pub fn set_readme(&mut self, readme: &str) -> &mut Self {
        self.readme = Some(readme.to_string());
        self
    }

    pub fn set_summary(&mut self, summary: &str) -> &mut Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn set_plugin_data(&mut self, plugin_data: Map<String, Value>) -> &mut Self {
        self.plugin_data = plugin_data;
        self
    }

    pub fn add_image(&mut self, bytes: Vec<u8>, extension: &str, caption: Option<&str>) -> &mut Self {
        self.images
            .push(PendingImage::new(bytes, extension, caption.map(str::to_string)));
        self
    }
}

/// Builder for a whole pack
#[derive(Debug, Clone)]
pub struct PackBuilder {
    name: String,
    readme: String,
    summary: Option<String>,
    images: Vec<PendingImage>,
    items: Vec<PackItemBuilder>,
}

impl Default for PackBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PackBuilder {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            readme: String::new(),
            summary: None,
            images: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[PackItemBuilder] {
        &self.items
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }

    pub fn set_readme(&mut self, readme: &str) -> &mut Self {
        self.readme = readme.to_string();
        self
    }

    pub fn set_summary(&mut self, summary: &str) -> &mut Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn add_image(&mut self, bytes: Vec<u8>, extension: &str, caption: Option<&str>) -> &mut Self {
        self.images
            .push(PendingImage::new(bytes, extension, caption.map(str::to_string)));
        self
    }

    /// Start a new item and return it for configuration
    pub fn add_mod_item(&mut self, mod_id: &str) -> &mut PackItemBuilder {
        let index = self.items.len();
        self.items.push(PackItemBuilder::new(mod_id));
        &mut self.items[index]
    }

    /// Drop a previously added item, returning whether it existed
    pub fn remove_mod_item(&mut self, mod_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.mod_id != mod_id);
        self.items.len() != before
    }

    /// Manifest as it will be written, without touching any archive
    pub fn manifest(&self) -> Result<PackManifest, PackError> {
        Ok(self.layout()?.0)
    }

    /// Write the pack archive and return its manifest
    pub fn build<W: Write + Seek>(&self, writer: W) -> Result<PackManifest, PackError> {
        let (manifest, files) = self.layout()?;

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(writer);

        zip.start_file(MANIFEST_FILE, options)?;
        let manifest_json = serde_json::to_vec_pretty(&manifest)?;
        zip.write_all(&manifest_json).map_err(|source| PackError::Io {
            path: PathBuf::from(MANIFEST_FILE),
            source,
        })?;

        for (path, bytes) in files {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(bytes).map_err(|source| PackError::Io {
                path: PathBuf::from(&path),
                source,
            })?;
        }

        zip.finish()?;
        debug!(
            "Wrote pack '{}' with {} items and {} pack images",
            manifest.name,
            manifest.items.len(),
            manifest.images.len()
        );
        Ok(manifest)
    }

    /// Write the pack archive to `path`, creating parent directories
    pub fn write_to_path(&self, path: &Path) -> Result<PackManifest, PackError> {
        let io_err = |source| PackError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = std::fs::File::create(path).map_err(io_err)?;
        self.build(file)
    }

    /// Assign archive paths; returns the manifest and the files to write
    fn layout(&self) -> Result<(PackManifest, Vec<(String, &[u8])>), PackError> {
        if self.name.trim().is_empty() {
            return Err(PackError::EmptyName);
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.mod_id.as_str()) {
                return Err(PackError::DuplicateItem {
                    mod_id: item.mod_id.clone(),
                });
            }
        }

        let mut files = Vec::new();
        let images = place(&mut files, "images", &self.images);

        let mut segments = HashSet::new();
        let items = self
            .items
            .iter()
            .map(|item| {
                let segment = unique_segment(&mut segments, &item.mod_id);
                PackItem {
                    mod_id: item.mod_id.clone(),
                    name: item.name.clone(),
                    readme: item.readme.clone(),
                    summary: item.summary.clone(),
                    images: place(&mut files, &format!("items/{segment}"), &item.images),
                    plugin_data: item.plugin_data.clone(),
                }
            })
            .collect();

        let manifest = PackManifest {
            name: self.name.clone(),
            readme: self.readme.clone(),
            summary: self.summary.clone(),
            images,
            items,
        };
        Ok((manifest, files))
    }
}

/// Number images under `dir`, queueing their bytes for the archive
fn place<'a>(
    files: &mut Vec<(String, &'a [u8])>,
    dir: &str,
    images: &'a [PendingImage],
) -> Vec<PackImage> {
    images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let path = format!("{dir}/{index}.{}", image.extension);
            files.push((path.clone(), image.bytes.as_slice()));
            PackImage {
                path,
                caption: image.caption.clone(),
            }
        })
        .collect()
}

/// Sanitized segment for `mod_id`, suffixed `-<n>` when already taken
fn unique_segment(taken: &mut HashSet<String>, mod_id: &str) -> String {
    let base = sanitize_path_segment(mod_id);
    let mut segment = base.clone();
    let mut n = 2;
    while !taken.insert(segment.clone()) {
        segment = format!("{base}-{n}");
        n += 1;
    }
    segment
}

/// Make a mod id safe to use as a single archive path segment
pub fn sanitize_path_segment(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match cleaned.trim_matches('.') {
        "" => "_".to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    include!("builder.test.rs");
}
