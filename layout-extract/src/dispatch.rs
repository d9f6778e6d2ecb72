//! Runtime-family version-bucket dispatch.
//!
//! Grounded on `python.DataMapForLayout`/`ruby.DataMapForLayout`: a table
//! of semver constraints to version-bucket constructors, walked in
//! order, first match wins. Each bucket implements `Describe`; once a
//! descriptor resolves we convert to the family's canonical layout and
//! flatten it into `LayoutData` for the output envelope.

use layout_dwarf::resolver::{resolve_routes, RouteOutcome, SymbolTable};
use layout_dwarf::TypeGraph;
use layout_types::families::{
    GlibcPthread, Python27, Python313, Python3Modern, Python33To39, Ruby26To27, Ruby3x,
};
use layout_types::{build_descriptor, LayoutData, RuntimeFamily, Version};

use crate::error::DriverError;

/// Builds a descriptor for `family`/`version`, resolves it against
/// `graph`/`symbols`, and returns the flattened layout data.
///
/// Unlike the bucket-internal `RouteOutcome`, a whole-bucket request
/// that resolves with every route `NotFound` still succeeds: their
/// destinations simply keep [`layout_types::families::DOES_NOT_EXIST`]:
/// "type not present in this build" is a normal, expected result for
/// older/newer runtime flavours.
pub fn extract_layout(
    family: RuntimeFamily,
    version: &Version,
    graph: &TypeGraph,
    symbols: &SymbolTable,
) -> Result<LayoutData, DriverError> {
    match family {
        RuntimeFamily::Python => extract_python(version, graph, symbols),
        RuntimeFamily::Ruby => extract_ruby(version, graph, symbols),
        RuntimeFamily::Glibc => extract_glibc(graph, symbols),
    }
}

macro_rules! run_bucket {
    ($bucket:expr, $graph:expr, $symbols:expr) => {{
        let mut bucket = $bucket;
        let mut routes = build_descriptor(&mut bucket)?;
        let outcomes = resolve_routes($graph, $symbols, &mut routes)?;
        log::debug!(
            "resolved {} of {} routes",
            outcomes.iter().filter(|o| **o == RouteOutcome::Resolved).count(),
            outcomes.len()
        );
        bucket
    }};
}

fn extract_python(
    version: &Version,
    graph: &TypeGraph,
    symbols: &SymbolTable,
) -> Result<LayoutData, DriverError> {
    let v = semver::Version::from(*version);
    let canonical = if in_range(&v, 2, 7, 0, 2, 7, u64::MAX) {
        run_bucket!(Python27::default(), graph, symbols).to_canonical()
    } else if in_range(&v, 3, 3, 0, 3, 9, u64::MAX) {
        run_bucket!(Python33To39::default(), graph, symbols).to_canonical()
    } else if in_range(&v, 3, 10, 0, 3, 10, u64::MAX) {
        run_bucket!(Python3Modern::python310(), graph, symbols).to_canonical()
    } else if in_range(&v, 3, 11, 0, 3, 11, u64::MAX) {
        run_bucket!(Python3Modern::python311(), graph, symbols).to_canonical()
    } else if in_range(&v, 3, 12, 0, 3, 12, u64::MAX) {
        run_bucket!(Python3Modern::python312(), graph, symbols).to_canonical()
    } else if v.major == 3 && v.minor >= 13 {
        run_bucket!(Python313::default(), graph, symbols).to_canonical()
    } else {
        return Err(DriverError::UnsupportedVersion {
            family: "python".to_string(),
            version: *version,
        });
    };
    Ok(canonical.to_layout_data())
}

fn extract_ruby(
    version: &Version,
    graph: &TypeGraph,
    symbols: &SymbolTable,
) -> Result<LayoutData, DriverError> {
    let v = semver::Version::from(*version);
    let canonical = if in_range(&v, 2, 6, 0, 2, 7, u64::MAX) {
        run_bucket!(Ruby26To27::default(), graph, symbols).to_canonical()
    } else if v.major == 3 {
        run_bucket!(Ruby3x::default(), graph, symbols).to_canonical()
    } else {
        return Err(DriverError::UnsupportedVersion {
            family: "ruby".to_string(),
            version: *version,
        });
    };
    Ok(canonical.to_layout_data())
}

fn extract_glibc(graph: &TypeGraph, symbols: &SymbolTable) -> Result<LayoutData, DriverError> {
    let canonical = run_bucket!(GlibcPthread::default(), graph, symbols).to_canonical();
    Ok(canonical.to_layout_data())
}

#[allow(clippy::too_many_arguments)]
fn in_range(
    v: &semver::Version,
    min_major: u64,
    min_minor: u64,
    min_patch: u64,
    max_major: u64,
    max_minor: u64,
    max_patch: u64,
) -> bool {
    let min = (min_major, min_minor, min_patch);
    let max = (max_major, max_minor, max_patch);
    let this = (v.major, v.minor, v.patch);
    this >= min && this <= max
}
