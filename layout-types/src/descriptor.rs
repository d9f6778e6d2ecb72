//! Descriptor construction: turns a tagged record into an ordered list
//! of route trees.
//!
//! The source this is modelled on reads struct tags through reflection
//! and mutates fields through a `reflect.Value`. Rust has neither, so the
//! record hands out its own tags and destinations explicitly: each field
//! contributes one `FieldTag` carrying the raw tag string alongside a
//! `&mut i64` already borrowed from the record. No derive macro, no
//! runtime type inspection — see DESIGN.md for why a hand-written trait
//! impl was chosen over a proc-macro here.

use thiserror::Error;

use crate::route::{Extractor, Op, RouteNode};

/// One annotated field, as handed to `build_descriptor` by a record's
/// `Describe` impl.
pub struct FieldTag<'a> {
    /// The raw tag value, e.g. `"PyObject.ob_type"`, `""`, or `"-"`.
    pub tag: &'a str,
    pub op: Op,
    pub is_static: bool,
    pub target: &'a mut i64,
}

impl<'a> FieldTag<'a> {
    pub fn offset_of(tag: &'a str, target: &'a mut i64) -> Self {
        FieldTag {
            tag,
            op: Op::OffsetOf,
            is_static: false,
            target,
        }
    }

    pub fn offset_of_static(tag: &'a str, target: &'a mut i64) -> Self {
        FieldTag {
            tag,
            op: Op::OffsetOf,
            is_static: true,
            target,
        }
    }

    pub fn size_of(tag: &'a str, target: &'a mut i64) -> Self {
        FieldTag {
            tag,
            op: Op::SizeOf,
            is_static: false,
            target,
        }
    }
}

/// A record whose fields are each annotated with an `OffsetOf`/`SizeOf`
/// tag and an integer destination. Implementors are the per-runtime
/// version-bucket structs in [`crate::families`].
pub trait Describe {
    fn describe(&mut self) -> Vec<FieldTag<'_>>;
}

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("descriptor has no tagged fields")]
    Empty,
    #[error("tag {tag:?} has {found} component(s), {op:?} requires at least {min}")]
    TooFewComponents {
        tag: String,
        op: Op,
        min: usize,
        found: usize,
    },
}

/// Builds the route list for one descriptor.
///
/// Routes sharing the same dotted prefix collapse into a single
/// `RouteNode` with multiple extractors, in the order fields were
/// declared on `value`.
pub fn build_descriptor<T: Describe>(
    value: &mut T,
) -> Result<Vec<RouteNode<'_>>, DescriptorError> {
    let tags = value.describe();
    if tags.is_empty() {
        return Err(DescriptorError::Empty);
    }

    let mut routes: Vec<RouteNode<'_>> = Vec::new();
    for field in tags {
        if field.tag.is_empty() || field.tag == "-" {
            continue;
        }

        let parts: Vec<&str> = field.tag.split('.').collect();
        let min = match field.op {
            Op::SizeOf => 1,
            Op::OffsetOf => 2,
        };
        if parts.len() < min {
            return Err(DescriptorError::TooFewComponents {
                tag: field.tag.to_string(),
                op: field.op,
                min,
                found: parts.len(),
            });
        }

        let (path, source) = if parts.len() == 1 {
            (vec![parts[0].to_string()], parts[0].to_string())
        } else {
            let path = parts[..parts.len() - 1]
                .iter()
                .map(|s| s.to_string())
                .collect();
            (path, parts[parts.len() - 1].to_string())
        };

        let node = match routes.iter_mut().find(|r| r.path == path) {
            Some(node) => node,
            None => {
                routes.push(RouteNode::new(path));
                routes.last_mut().unwrap()
            }
        };
        node.extractors.push(Extractor {
            source,
            op: field.op,
            is_static: field.is_static,
            target: field.target,
        });
    }

    if routes.is_empty() {
        return Err(DescriptorError::Empty);
    }

    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        a: i64,
        b: i64,
        size: i64,
        skipped: i64,
    }

    impl Describe for Fixture {
        fn describe(&mut self) -> Vec<FieldTag<'_>> {
            vec![
                FieldTag::offset_of("test_t.a", &mut self.a),
                FieldTag::offset_of("test_t.b", &mut self.b),
                FieldTag::size_of("test_t", &mut self.size),
                FieldTag::size_of("-", &mut self.skipped),
            ]
        }
    }

    #[test]
    fn coalesces_shared_prefix_into_one_route() {
        let mut fixture = Fixture {
            a: -1,
            b: -1,
            size: -1,
            skipped: -1,
        };
        let routes = build_descriptor(&mut fixture).unwrap();
        // `test_t.a`, `test_t.b`, and whole-type `test_t` all share the
        // same leaf: one route, three extractors.
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, vec!["test_t".to_string()]);
        assert_eq!(routes[0].extractors.len(), 3);
    }

    struct Empty;
    impl Describe for Empty {
        fn describe(&mut self) -> Vec<FieldTag<'_>> {
            Vec::new()
        }
    }

    #[test]
    fn empty_descriptor_is_an_error() {
        let mut empty = Empty;
        assert!(matches!(
            build_descriptor(&mut empty),
            Err(DescriptorError::Empty)
        ));
    }

    struct BadOffset {
        x: i64,
    }
    impl Describe for BadOffset {
        fn describe(&mut self) -> Vec<FieldTag<'_>> {
            vec![FieldTag::offset_of("justatype", &mut self.x)]
        }
    }

    #[test]
    fn offset_of_requires_at_least_two_components() {
        let mut bad = BadOffset { x: -1 };
        assert!(matches!(
            build_descriptor(&mut bad),
            Err(DescriptorError::TooFewComponents { min: 2, found: 1, .. })
        ));
    }
}
