//! The merge pass: collapse consecutive versions with identical data
//! into one semver-range-keyed group.
//!
//! Grounded directly on `mergelayout.go::mergeLayoutFiles`: sort by
//! ascending version, sweep once comparing deep equality of the
//! current group's data against the next input, emit a group on
//! divergence, and always emit the trailing group.

use std::path::Path;

use layout_types::{LayoutData, SemverRange, Version};

use crate::error::DriverError;
use crate::output;

/// One emitted group: a contiguous run of versions sharing identical
/// `data`, keyed by the minimal semver range string that covers them.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedGroup {
    pub range: SemverRange,
    pub data: LayoutData,
}

/// Runs the sweep: no two consecutive emitted groups have equal data.
/// `inputs` need not already be sorted; this function sorts by version
/// first so merged groups come out in ascending semver order.
pub fn merge(mut inputs: Vec<(Version, LayoutData)>) -> Vec<MergedGroup> {
    inputs.sort_by_key(|(v, _)| *v);

    let mut groups = Vec::new();
    let mut current: Option<(Version, Version, LayoutData)> = None;

    for (version, data) in inputs {
        current = match current {
            None => Some((version, version, data)),
            Some((min, max, current_data)) => {
                if current_data == data {
                    Some((min, version, current_data))
                } else {
                    groups.push(finish_group(min, max, current_data));
                    Some((version, version, data))
                }
            }
        };
    }
    if let Some((min, max, data)) = current {
        groups.push(finish_group(min, max, data));
    }
    groups
}

fn finish_group(min: Version, max: Version, data: LayoutData) -> MergedGroup {
    log::debug!("emitting group {min}..{max}");
    MergedGroup {
        range: SemverRange::spanning(min, max),
        data,
    }
}

/// Reads every file in `inputs`, runs [`merge`], and writes one file per
/// emitted group into `output_dir`.
pub fn merge_files(inputs: &[impl AsRef<Path>], output_dir: &Path) -> Result<Vec<MergedGroup>, DriverError> {
    let mut parsed = Vec::with_capacity(inputs.len());
    for path in inputs {
        let layout = output::read_versioned_layout(path.as_ref())?;
        parsed.push((layout.version, layout.data));
    }

    let groups = merge(parsed);
    for group in &groups {
        output::write_merged_group(output_dir, &group.range, &group.data)?;
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, i64)]) -> LayoutData {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn collapses_consecutive_equal_versions_and_keeps_distinct_ones() {
        let d1 = data(&[("a", 1)]);
        let d2 = data(&[("a", 2)]);
        let inputs = vec![
            (Version::new(3, 7, 0), d1.clone()),
            (Version::new(3, 7, 1), d1.clone()),
            (Version::new(3, 7, 2), d2.clone()),
            (Version::new(3, 7, 3), d2.clone()),
            (Version::new(3, 8, 0), d1.clone()),
        ];
        let groups = merge(inputs);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].range.to_string(), "3.7.0 - 3.7.1");
        assert_eq!(groups[0].data, d1);
        assert_eq!(groups[1].range.to_string(), "3.7.2 - 3.7.3");
        assert_eq!(groups[1].data, d2);
        assert_eq!(groups[2].range.to_string(), "= 3.8.0");
        assert_eq!(groups[2].data, d1);
    }

    /// All inputs equal collapse to a single spanning range.
    #[test]
    fn all_equal_collapses_to_one_range() {
        let d = data(&[("a", 1)]);
        let inputs = vec![
            (Version::new(1, 0, 0), d.clone()),
            (Version::new(1, 0, 1), d.clone()),
            (Version::new(1, 1, 0), d.clone()),
        ];
        let groups = merge(inputs);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].range.to_string(), "1.0.0 - 1.1.0");
    }

    /// Every consecutive pair differs, one range per input.
    #[test]
    fn all_distinct_emits_one_group_per_input() {
        let inputs = vec![
            (Version::new(1, 0, 0), data(&[("a", 1)])),
            (Version::new(1, 0, 1), data(&[("a", 2)])),
            (Version::new(1, 0, 2), data(&[("a", 3)])),
        ];
        let groups = merge(inputs);
        assert_eq!(groups.len(), 3);
        for group in &groups {
            assert!(group.range.to_string().starts_with("= "));
        }
    }

    #[test]
    fn unsorted_input_is_sorted_before_sweeping() {
        let d = data(&[("a", 1)]);
        let inputs = vec![
            (Version::new(2, 0, 0), d.clone()),
            (Version::new(1, 0, 0), d.clone()),
        ];
        let groups = merge(inputs);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].range.to_string(), "1.0.0 - 2.0.0");
    }

    #[test]
    fn single_input_is_a_single_version_range() {
        let groups = merge(vec![(Version::new(1, 2, 3), data(&[("a", 1)]))]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].range.to_string(), "= 1.2.3");
    }
}
