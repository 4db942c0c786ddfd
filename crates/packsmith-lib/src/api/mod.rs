//! # API Module
//!
//! Remote package sources and the types they exchange.
//!
//! ## Modules
//!
//! - [`provider`] - `PackageProvider` trait, candidates, and an in-memory provider
//! - [`version`] - Lenient, totally ordered package versions
//! - [`nuget`] - NuGet v3 feed provider
//! - [`gamebanana`] - GameBanana search provider

pub mod gamebanana;
pub mod nuget;
pub mod provider;
pub mod version;

pub use gamebanana::GameBananaProvider;
pub use nuget::NuGetProvider;
pub use provider::{
    DownloadableImage, ModIdentity, PackageCandidate, PackageProvider, ProviderError,
    SearchOptions, StaticPackageProvider,
};
pub use version::{PackageVersion, VersionError};

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

/// Percent-encode a value for use inside a query string
pub(crate) fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}
