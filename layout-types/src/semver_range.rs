//! Semver range keys for merged layout groups: either a single version
//! (`"= X.Y.Z"`) or an inclusive range of contiguous versions
//! (`"X.Y.Z - A.B.C"`).
//!
//! `semver::VersionReq` parses caret/tilde/comparator constraints but not
//! this hyphen-range shape, so the range itself is hand-rolled; `Version`
//! parsing and ordering still go through `semver`/[`crate::envelope::Version`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::envelope::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemverRange {
    Single(Version),
    Range(Version, Version),
}

impl SemverRange {
    pub fn single(v: Version) -> Self {
        SemverRange::Single(v)
    }

    /// Builds the minimal range for a `(min, max)` pair, collapsing to
    /// `Single` when they're equal (the `"= X.Y.Z"` form for one-version
    /// groups).
    pub fn spanning(min: Version, max: Version) -> Self {
        if min == max {
            SemverRange::Single(min)
        } else {
            SemverRange::Range(min, max)
        }
    }

    pub fn matches(&self, v: &Version) -> bool {
        match self {
            SemverRange::Single(only) => only == v,
            SemverRange::Range(min, max) => min <= v && v <= max,
        }
    }
}

impl fmt::Display for SemverRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemverRange::Single(v) => write!(f, "= {v}"),
            SemverRange::Range(min, max) => write!(f, "{min} - {max}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SemverRangeParseError {
    #[error("empty semver range string")]
    Empty,
    #[error("invalid version in range {0:?}")]
    InvalidVersion(String),
    #[error("unrecognized semver range shape {0:?}")]
    Unrecognized(String),
}

impl FromStr for SemverRange {
    type Err = SemverRangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SemverRangeParseError::Empty);
        }
        if let Some(rest) = s.strip_prefix('=') {
            let v: Version = rest
                .trim()
                .parse()
                .map_err(|_| SemverRangeParseError::InvalidVersion(s.to_string()))?;
            return Ok(SemverRange::Single(v));
        }
        if let Some((min_str, max_str)) = s.split_once(" - ") {
            let min: Version = min_str
                .trim()
                .parse()
                .map_err(|_| SemverRangeParseError::InvalidVersion(s.to_string()))?;
            let max: Version = max_str
                .trim()
                .parse()
                .map_err(|_| SemverRangeParseError::InvalidVersion(s.to_string()))?;
            return Ok(SemverRange::Range(min, max));
        }
        Err(SemverRangeParseError::Unrecognized(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_round_trips() {
        let r = SemverRange::single(Version::new(3, 8, 0));
        assert_eq!(r.to_string(), "= 3.8.0");
        assert_eq!(r.to_string().parse::<SemverRange>().unwrap(), r);
    }

    #[test]
    fn range_round_trips_and_matches_inclusive() {
        let r = SemverRange::spanning(Version::new(3, 7, 0), Version::new(3, 7, 3));
        assert_eq!(r.to_string(), "3.7.0 - 3.7.3");
        assert!(r.matches(&Version::new(3, 7, 0)));
        assert!(r.matches(&Version::new(3, 7, 2)));
        assert!(r.matches(&Version::new(3, 7, 3)));
        assert!(!r.matches(&Version::new(3, 7, 4)));
    }

    #[test]
    fn spanning_equal_endpoints_collapses_to_single() {
        let v = Version::new(1, 0, 0);
        assert_eq!(SemverRange::spanning(v, v), SemverRange::Single(v));
    }
}
