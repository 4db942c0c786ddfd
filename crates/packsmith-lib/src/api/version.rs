//! Package version parsing and ordering
//!
//! Package feeds publish versions in several loose shapes: `1.0`, `v2.3.1`,
//! four-part `1.2.3.4`, and semver pre-releases. They are normalised into a
//! semver core plus an optional fourth `revision` component so candidates from
//! different providers compare on one scale.

use semver::Prerelease;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Version parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Empty version string")]
    Empty,

    #[error("Invalid version '{input}': {reason}")]
    Invalid { input: String, reason: String },
}

/// Totally ordered package version
///
/// Build metadata is dropped on parse; it never participates in equality or
/// ordering. Pre-release labels are stored lower-cased. A release sorts after every pre-release with the same numbers.
#[derive(Debug, Clone, Eq)]
pub struct PackageVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub revision: u64,
    pub pre: Prerelease,
}

impl PackageVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision: 0,
            pre: Prerelease::EMPTY,
        }
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Parse, returning `None` for blank or malformed input
    pub fn parse_lenient(input: &str) -> Option<Self> {
        input.parse().ok()
    }
}

impl FromStr for PackageVersion {
    type Err = VersionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let invalid = |reason: &str| VersionError::Invalid {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let without_build = trimmed.split('+').next().unwrap_or(trimmed);
        let (numbers, pre) = match without_build.split_once('-') {
            Some((numbers, pre)) => (numbers, Some(pre)),
            None => (without_build, None),
        };

        let parts = numbers
            .split('.')
            .map(|part| part.parse::<u64>().map_err(|_| invalid("non-numeric component")))
            .collect::<Result<Vec<_>, _>>()?;
        if parts.len() > 4 {
            return Err(invalid("more than four components"));
        }

        let pre = match pre {
            Some("") => return Err(invalid("empty pre-release tag")),
            // NuGet release labels compare case-insensitively
            Some(pre) => Prerelease::new(&pre.to_ascii_lowercase())
                .map_err(|e| invalid(&e.to_string()))?,
            None => Prerelease::EMPTY,
        };

        let component = |i: usize| parts.get(i).copied().unwrap_or(0);
        Ok(Self {
            major: component(0),
            minor: component(1),
            patch: component(2),
            revision: component(3),
            pre,
        })
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch, self.revision)
            .cmp(&(other.major, other.minor, other.patch, other.revision))
            .then_with(|| self.pre.cmp(&other.pre))
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.revision != 0 {
            write!(f, ".{}", self.revision)?;
        }
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        Ok(())
    }
}

impl Serialize for PackageVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PackageVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    include!("version.test.rs");
}
