//! # Pack Module
//!
//! Everything between installed mods and a finished pack archive.
//!
//! - [`config`] - `ModConfig.json` loading and resolver detection
//! - [`aggregate`] - Best-effort metadata merge across providers
//! - [`image`] - Image conversion seam
//! - [`builder`] - Pack manifest and zip writer
//! - [`creator`] - Orchestration from mod configs to a pack builder

pub mod aggregate;
pub mod builder;
pub mod config;
pub mod creator;
pub mod image;

pub use aggregate::{AggregateError, AggregatedResult, aggregate, merge_candidates};
pub use builder::{PackBuilder, PackError, PackImage, PackItem, PackItemBuilder, PackManifest};
pub use config::{ModConfig, ModConfigError, load_mod_configs};
pub use creator::{AutoPackCreator, CreateError, can_create, validate_can_create};
pub use image::{ConvertedImage, ImageConverter, ImageError, PassthroughConverter};
