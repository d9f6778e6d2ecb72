//! The versioned envelope a resolved layout is written into.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A semantic version, serialized as a nested `{major, minor, patch}`
/// object rather than `semver::Version`'s bare-string form, matching
/// the output file's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// The `<sanitized_version>` component of a per-version output file
    /// name: dots become underscores, any leading `v` is stripped.
    pub fn sanitized(&self) -> String {
        format!("{}_{}_{}", self.major, self.minor, self.patch)
    }
}

impl From<semver::Version> for Version {
    fn from(v: semver::Version) -> Self {
        Version::new(v.major, v.minor, v.patch)
    }
}

impl From<Version> for semver::Version {
    fn from(v: Version) -> Self {
        semver::Version::new(v.major, v.minor, v.patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = semver::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix('v').unwrap_or(s);
        semver::Version::parse(stripped).map(Version::from)
    }
}

/// Field-name to integer-value mapping of a resolved layout. A
/// `BTreeMap` keeps key order deterministic across runs.
pub type LayoutData = BTreeMap<String, i64>;

/// One extracted layout, ready to be written to a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedLayout {
    pub version: Version,
    pub data: LayoutData,
    /// The GNU build-id of the binary this layout was extracted from, if
    /// the section was present. Carried for provenance, never required
    /// for resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
}

impl VersionedLayout {
    pub fn new(version: Version, data: LayoutData) -> Self {
        VersionedLayout {
            version,
            data,
            build_id: None,
        }
    }

    pub fn with_build_id(mut self, build_id: impl Into<String>) -> Self {
        self.build_id = Some(build_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_version_replaces_dots() {
        let v = Version::new(3, 11, 2);
        assert_eq!(v.sanitized(), "3_11_2");
    }

    #[test]
    fn from_str_strips_leading_v() {
        let v: Version = "v1.2.3".parse().unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }
}
