//! Embedded-layout selection.
//!
//! The embedding mechanism itself — scanning `layout/<architecture>/`
//! from a downstream binary's embedded filesystem — is out of scope; this
//! is the pure selection function it calls once it has turned its
//! directory listing into a collection of `(range, layout)` pairs,
//! mirroring `ruby.go`'s `GetVersionMap` minus the directory walk.

use crate::envelope::Version;
use crate::semver_range::SemverRange;

/// Returns the first entry whose range matches `requested`, in the order
/// `entries` is given (filesystem enumeration order upstream). `None` if
/// nothing matches.
pub fn select_layout<'a, T>(
    entries: &'a [(SemverRange, T)],
    requested: &Version,
) -> Option<&'a T> {
    entries
        .iter()
        .find(|(range, _)| range.matches(requested))
        .map(|(_, layout)| layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_first_matching_entry() {
        let entries = vec![
            (
                SemverRange::spanning(Version::new(2, 6, 0), Version::new(2, 7, 9)),
                "ruby26_27",
            ),
            (
                SemverRange::spanning(Version::new(3, 0, 0), Version::new(3, 99, 99)),
                "ruby30",
            ),
        ];
        assert_eq!(
            select_layout(&entries, &Version::new(2, 7, 1)),
            Some(&"ruby26_27")
        );
        assert_eq!(
            select_layout(&entries, &Version::new(3, 2, 0)),
            Some(&"ruby30")
        );
    }

    #[test]
    fn no_match_is_none() {
        let entries: Vec<(SemverRange, &str)> = vec![(
            SemverRange::single(Version::new(1, 0, 0)),
            "only-1-0-0",
        )];
        assert_eq!(select_layout(&entries, &Version::new(2, 0, 0)), None);
    }
}
