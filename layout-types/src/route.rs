//! Routes and extractors: the plain-data shape a descriptor is built from.
//!
//! A route is a dotted path through composite types; an extractor is a
//! single `OffsetOf`/`SizeOf` request attached at the route's leaf. Routes
//! sharing the same path coalesce into one `RouteNode` so the resolver
//! only has to walk each path once.

/// The two operations an extractor can request at a route's leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    OffsetOf,
    SizeOf,
}

/// A single leaf-level request: which member (or the leaf type itself) to
/// measure, how, and where to write the result.
pub struct Extractor<'a> {
    /// For `OffsetOf`: the member name within the leaf type. For `SizeOf`:
    /// either the leaf type's own name (whole-type size) or a member name
    /// (size of that member's declared type).
    pub source: String,
    pub op: Op,
    /// Only meaningful for `OffsetOf`: the member is a class-scope static
    /// data member, resolved via the symbol table by linkage name rather
    /// than by byte-offset.
    pub is_static: bool,
    pub target: &'a mut i64,
}

/// One unique dotted path, with every extractor that targets its leaf.
///
/// `path[0]` is the head type name, resolved against the debug-info type
/// universe; `path[1..]` are member names, each stepping into the
/// previous element's composite type. A route of length 1 has no
/// intermediate hops — its leaf is the head type itself.
pub struct RouteNode<'a> {
    pub path: Vec<String>,
    pub extractors: Vec<Extractor<'a>>,
}

impl<'a> RouteNode<'a> {
    pub fn new(path: Vec<String>) -> Self {
        RouteNode {
            path,
            extractors: Vec::new(),
        }
    }

    pub fn head(&self) -> &str {
        &self.path[0]
    }

    /// The member names to walk through after the head, in order.
    pub fn hops(&self) -> &[String] {
        &self.path[1..]
    }
}
