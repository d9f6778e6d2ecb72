//! File naming and serde_yaml (de)serialization.
//!
//! Grounded on `structlayout.go`'s `filepath.Join(outputDir, ...)` +
//! `yaml.NewEncoder` pattern for per-version files, and
//! `mergelayout.go`'s naming merged files directly after the range
//! string. `serde_yaml` fills the one concern neither `cargo-geiger`
//! crate needs: structured file output (see DESIGN.md).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use layout_types::{LayoutData, SemverRange, VersionedLayout};

use crate::error::DriverError;

/// `<runtime>_<sanitized_version>.<ext>`.
pub fn per_version_filename(runtime: &str, layout: &VersionedLayout) -> String {
    format!("{runtime}_{}.yaml", layout.version.sanitized())
}

/// `<range>.<ext>`. The raw range string is used verbatim as the
/// teacher's own `mergelayout.go` does — it is not further sanitized,
/// since `"3.7.0 - 3.7.3"` is already a legal filename component on
/// every platform this tool targets.
pub fn merged_filename(range: &SemverRange) -> String {
    format!("{range}.yaml")
}

pub fn write_versioned_layout(
    dir: &Path,
    runtime: &str,
    layout: &VersionedLayout,
) -> Result<PathBuf, DriverError> {
    let path = dir.join(per_version_filename(runtime, layout));
    let contents =
        serde_yaml::to_string(layout).map_err(|source| DriverError::Yaml {
            path: path.clone(),
            source,
        })?;
    fs::write(&path, contents).map_err(|source| DriverError::FileIo {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

pub fn read_versioned_layout(path: &Path) -> Result<VersionedLayout, DriverError> {
    let contents = fs::read_to_string(path).map_err(|source| DriverError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| DriverError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_merged_group(
    dir: &Path,
    range: &SemverRange,
    data: &LayoutData,
) -> Result<PathBuf, DriverError> {
    let path = dir.join(merged_filename(range));
    let mut wrapper: BTreeMap<String, &LayoutData> = BTreeMap::new();
    wrapper.insert(range.to_string(), data);
    let contents = serde_yaml::to_string(&wrapper).map_err(|source| DriverError::Yaml {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, contents).map_err(|source| DriverError::FileIo {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_types::Version;
    use tempfile::tempdir;

    #[test]
    fn round_trips_a_versioned_layout() {
        let dir = tempdir().unwrap();
        let mut data = LayoutData::new();
        data.insert("a".to_string(), 0);
        data.insert("b".to_string(), 4);
        let layout = VersionedLayout::new(Version::new(3, 11, 2), data.clone());

        let path = write_versioned_layout(dir.path(), "python", &layout).unwrap();
        assert_eq!(path.file_name().unwrap(), "python_3_11_2.yaml");

        let reread = read_versioned_layout(&path).unwrap();
        assert_eq!(reread.version, layout.version);
        assert_eq!(reread.data, data);
    }

    #[test]
    fn merged_filename_uses_raw_range_string() {
        let range = SemverRange::spanning(Version::new(3, 7, 0), Version::new(3, 7, 3));
        assert_eq!(merged_filename(&range), "3.7.0 - 3.7.3.yaml");
    }
}
