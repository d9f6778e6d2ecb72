//! End-to-end exercise of the `merge` subcommand's library surface,
//! placed under `tests/` the way `cargo-geiger/tests/integration_tests.rs`
//! exercises its own binary against fixture crates. This tool has no
//! fixture ELF binaries to scan (building one is out of scope for a test
//! that can't invoke a toolchain), so the fixture here is a handful of
//! already-extracted layout files instead, driving `merge_files` and
//! `resolve_inputs`-equivalent glob expansion the way `main.rs` does.

use std::fs;

use layout_extract::merge::merge_files;
use layout_types::{LayoutData, Version, VersionedLayout};
use rstest::rstest;
use tempfile::tempdir;

fn write_fixture(dir: &std::path::Path, runtime: &str, version: Version, data: &[(&str, i64)]) {
    let layout_data: LayoutData = data.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    let layout = VersionedLayout::new(version, layout_data);
    let contents = serde_yaml::to_string(&layout).unwrap();
    let filename = format!("{runtime}_{}.yaml", version.sanitized());
    fs::write(dir.join(filename), contents).unwrap();
}

#[test]
fn merges_a_directory_of_per_version_layouts_into_range_files() {
    let dir = tempdir().unwrap();
    let out = tempdir().unwrap();

    write_fixture(dir.path(), "python", Version::new(3, 7, 0), &[("a", 10)]);
    write_fixture(dir.path(), "python", Version::new(3, 7, 1), &[("a", 10)]);
    write_fixture(dir.path(), "python", Version::new(3, 7, 2), &[("a", 20)]);

    let pattern = dir.path().join("*.yaml");
    let inputs: Vec<std::path::PathBuf> = glob::glob(pattern.to_str().unwrap())
        .unwrap()
        .filter_map(Result::ok)
        .collect();
    assert_eq!(inputs.len(), 3);

    let groups = merge_files(&inputs, out.path()).unwrap();
    assert_eq!(groups.len(), 2);

    let written: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert!(written.contains(&"3.7.0 - 3.7.1.yaml".to_string()));
    assert!(written.contains(&"= 3.7.2.yaml".to_string()));
}

#[rstest]
#[case(Version::new(3, 8, 0), Version::new(3, 8, 0), "= 3.8.0.yaml")]
#[case(Version::new(2, 7, 0), Version::new(2, 7, 9), "2.7.0 - 2.7.9.yaml")]
fn single_group_filenames_match_the_range_string(
    #[case] min: Version,
    #[case] max: Version,
    #[case] expected_filename: &str,
) {
    let dir = tempdir().unwrap();
    let out = tempdir().unwrap();

    write_fixture(dir.path(), "ruby", min, &[("vm_offset", 64)]);
    if max != min {
        write_fixture(dir.path(), "ruby", max, &[("vm_offset", 64)]);
    }

    let entries: Vec<std::path::PathBuf> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();

    let groups = merge_files(&entries, out.path()).unwrap();
    assert_eq!(groups.len(), 1);
    assert!(out.path().join(expected_filename).exists());
}
