//! Driver-level error aggregation. Every fatal kind from the two
//! library crates folds in here via `#[from]`; the two kinds that only
//! make sense at the driver seam (`FileIo`, `SemverParse`) are added
//! directly. `main.rs` maps any `Err` here to exit code 1.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("unknown runtime family {0:?}")]
    UnknownFamily(String),

    #[error("no version bucket covers {family} {version}")]
    UnsupportedVersion {
        family: String,
        version: layout_types::Version,
    },

    #[error("building descriptor: {0}")]
    Descriptor(#[from] layout_types::DescriptorError),

    #[error("resolving routes: {0}")]
    Resolve(#[from] layout_dwarf::ResolveError),

    #[error("parsing semver range: {0}")]
    SemverParse(#[from] layout_types::SemverRangeParseError),

    #[error("invalid version {0:?}")]
    VersionParse(String),

    #[error("reading/writing {path}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("(de)serializing {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("globbing {pattern:?}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("no input files matched {0:?}")]
    NoInputFiles(String),
}
