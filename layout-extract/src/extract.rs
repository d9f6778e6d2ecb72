//! The `extract` subcommand: ELF → descriptor → resolver → one
//! versioned-envelope file. Grounded on
//! `structlayout.go::processAndWriteLayout`, generalized from a single
//! hardcoded Go interface value to the [`crate::dispatch`] table.

use std::path::{Path, PathBuf};

use layout_types::{RuntimeFamily, Version, VersionedLayout};

use crate::dispatch;
use crate::error::DriverError;
use crate::output;

pub struct ExtractRequest {
    pub input: PathBuf,
    pub family: RuntimeFamily,
    pub version: Version,
    pub output_dir: PathBuf,
}

/// Runs one full extraction: load the ELF, resolve the requested
/// family's routes against it, and write a single output file. No
/// partial output is ever written: the file is only created once
/// resolution has fully succeeded.
pub fn run(request: &ExtractRequest) -> Result<PathBuf, DriverError> {
    log::info!(
        "loading debug info from {}",
        request.input.display()
    );
    let loaded = layout_dwarf::load(&request.input)?;

    let data = dispatch::extract_layout(request.family, &request.version, &loaded.graph, &loaded.symbols)?;

    let mut layout = VersionedLayout::new(request.version, data);
    if let Some(build_id) = loaded.build_id {
        layout = layout.with_build_id(build_id);
    }

    ensure_dir(&request.output_dir)?;
    let path = output::write_versioned_layout(&request.output_dir, &request.family.to_string(), &layout)?;
    log::info!("wrote layout to {}", path.display());
    Ok(path)
}

fn ensure_dir(dir: &Path) -> Result<(), DriverError> {
    std::fs::create_dir_all(dir).map_err(|source| DriverError::FileIo {
        path: dir.to_path_buf(),
        source,
    })
}
