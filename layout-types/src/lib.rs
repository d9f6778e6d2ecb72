//! layout-types
//! ============
//!
//! Data model for struct layout extraction: routes, extractors, the
//! `Describe` trait that stands in for struct-tag reflection, versioned
//! envelopes, semver range keys, and the runtime-family dispatch tables
//! built on top of them.

#![forbid(unsafe_code)]

pub mod descriptor;
pub mod envelope;
pub mod families;
pub mod lookup;
pub mod route;
pub mod semver_range;

pub use descriptor::{build_descriptor, Describe, DescriptorError, FieldTag};
pub use envelope::{LayoutData, Version, VersionedLayout};
pub use families::{GlibcLayout, PythonLayout, RubyLayout, RuntimeFamily, DOES_NOT_EXIST};
pub use lookup::select_layout;
pub use route::{Extractor, Op, RouteNode};
pub use semver_range::{SemverRange, SemverRangeParseError};
