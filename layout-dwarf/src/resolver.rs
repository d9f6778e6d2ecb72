//! The debug-info resolver: type lookup, actionable-entry
//! disambiguation, walk-to-leaf, and extractor evaluation.
//!
//! Operates purely on an already-built [`TypeGraph`] and symbol table —
//! no file I/O, no `gimli` readers — which is what makes it testable
//! against hand-authored in-memory fixtures instead of real ELF
//! binaries, the same way `geiger_syn_visitor` is tested against
//! `syn::parse_str` output rather than scanned source files.

use std::collections::HashMap;

use layout_types::route::{Op, RouteNode};

use crate::error::ResolveError;
use crate::graph::{Tag, TypeEntry, TypeGraph, TypeGraphIndex};

/// A name-to-address table built from the object file's symbols, used
/// to resolve static/class-scope members.
pub struct SymbolTable {
    by_name: HashMap<String, u64>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            by_name: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, address: u64) {
        self.by_name.insert(name.into(), address);
    }

    pub fn lookup(&self, name: &str) -> Option<u64> {
        self.by_name.get(name).copied()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The per-route result of resolution: either every extractor on the
/// route was written, or the route's head type was absent from this
/// binary's debug info and every destination on it was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Resolved,
    NotFound,
}

/// Resolves every route against `graph`/`symbols`, writing through each
/// extractor's target. Returns one outcome per route, in route order.
/// A fatal error on any route aborts the whole batch: every fatal kind
/// here is a hard stop; only `NotFound` is per-route and non-fatal.
pub fn resolve_routes(
    graph: &TypeGraph,
    symbols: &SymbolTable,
    routes: &mut [RouteNode<'_>],
) -> Result<Vec<RouteOutcome>, ResolveError> {
    let mut outcomes = Vec::with_capacity(routes.len());
    for route in routes.iter_mut() {
        outcomes.push(resolve_route(graph, symbols, route)?);
    }
    Ok(outcomes)
}

fn resolve_route(
    graph: &TypeGraph,
    symbols: &SymbolTable,
    route: &mut RouteNode<'_>,
) -> Result<RouteOutcome, ResolveError> {
    let head = route.head().to_string();
    let candidates = graph.find_by_name(&head);
    if candidates.is_empty() {
        log::info!("route head {head:?} not present in debug info, skipping");
        return Ok(RouteOutcome::NotFound);
    }

    let Some(head_index) = pick_actionable(graph, &candidates) else {
        return Err(ResolveError::ResolutionFailed { head });
    };

    let mut cumulative_offset: u64 = 0;
    let mut current_index = graph.chase_typedefs(head_index);
    let mut parent_name = head.clone();

    for hop in route.hops() {
        let current = graph.get(current_index);
        let member = current
            .members
            .iter()
            .find(|m| &m.name == hop)
            .ok_or_else(|| ResolveError::FieldNotFound {
                field: hop.clone(),
                parent: parent_name.clone(),
            })?;

        let byte_offset = member.byte_offset.ok_or_else(|| ResolveError::FieldNotFound {
            field: hop.clone(),
            parent: parent_name.clone(),
        })?;
        cumulative_offset += byte_offset;

        let next_index = graph.chase_typedefs(member.type_index);
        if !graph.get(next_index).is_composite() {
            return Err(ResolveError::NotComposite {
                field: hop.clone(),
                parent: parent_name.clone(),
            });
        }
        parent_name = hop.clone();
        current_index = next_index;
    }

    let leaf = graph.get(current_index);
    let members_by_name: HashMap<&str, &_> = leaf
        .members
        .iter()
        .map(|m| (m.name.as_str(), m))
        .collect();

    for extractor in route.extractors.iter_mut() {
        let value = evaluate_extractor(
            graph,
            symbols,
            leaf,
            &members_by_name,
            &parent_name,
            cumulative_offset,
            extractor.source.as_str(),
            extractor.op,
            extractor.is_static,
        )?;
        *extractor.target = value;
    }

    Ok(RouteOutcome::Resolved)
}

#[allow(clippy::too_many_arguments)]
fn evaluate_extractor(
    graph: &TypeGraph,
    symbols: &SymbolTable,
    leaf: &TypeEntry,
    members_by_name: &HashMap<&str, &crate::graph::Member>,
    leaf_parent_name: &str,
    cumulative_offset: u64,
    source: &str,
    op: Op,
    is_static: bool,
) -> Result<i64, ResolveError> {
    match op {
        Op::SizeOf if leaf.name.as_deref() == Some(source) => {
            Ok(leaf.byte_size.unwrap_or(0) as i64)
        }
        Op::SizeOf => {
            let member = members_by_name
                .get(source)
                .ok_or_else(|| ResolveError::FieldNotFound {
                    field: source.to_string(),
                    parent: leaf_parent_name.to_string(),
                })?;
            let member_type = graph.get(graph.chase_typedefs(member.type_index));
            Ok(member_type.byte_size.unwrap_or(0) as i64)
        }
        Op::OffsetOf if is_static => {
            let member = members_by_name
                .get(source)
                .ok_or_else(|| ResolveError::FieldNotFound {
                    field: source.to_string(),
                    parent: leaf_parent_name.to_string(),
                })?;
            let linkage_name =
                member
                    .linkage_name
                    .as_ref()
                    .ok_or_else(|| ResolveError::LinkageNameMissing {
                        field: source.to_string(),
                        parent: leaf_parent_name.to_string(),
                    })?;
            let address =
                symbols
                    .lookup(linkage_name)
                    .ok_or_else(|| ResolveError::SymbolNotFound {
                        field: source.to_string(),
                        symbol: linkage_name.clone(),
                    })?;
            Ok(address as i64)
        }
        Op::OffsetOf => {
            let member = members_by_name
                .get(source)
                .ok_or_else(|| ResolveError::FieldNotFound {
                    field: source.to_string(),
                    parent: leaf_parent_name.to_string(),
                })?;
            let byte_offset = member.byte_offset.ok_or_else(|| ResolveError::FieldNotFound {
                field: source.to_string(),
                parent: leaf_parent_name.to_string(),
            })?;
            Ok((cumulative_offset + byte_offset) as i64)
        }
    }
}

/// Picks the single actionable entry among candidates sharing a name:
/// a structure/class with children and no declaration marker, or a
/// typedef whose followed-once target satisfies the same criteria.
/// Declaration-only and childless entries are skipped. `None` if no
/// candidate qualifies.
fn pick_actionable(graph: &TypeGraph, candidates: &[TypeGraphIndex]) -> Option<TypeGraphIndex> {
    for &idx in candidates {
        let entry = graph.get(idx);
        match entry.tag {
            Tag::Structure | Tag::Class => {
                if !entry.declaration && !entry.members.is_empty() {
                    return Some(idx);
                }
            }
            Tag::Typedef => {
                if let Some(target_idx) = entry.type_index {
                    let target = graph.get(target_idx);
                    if matches!(target.tag, Tag::Structure | Tag::Class)
                        && !target.declaration
                        && !target.members.is_empty()
                    {
                        return Some(idx);
                    }
                }
            }
            Tag::Other => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Member;

    fn composite(name: &str, byte_size: u64, members: Vec<Member>) -> TypeEntry {
        TypeEntry {
            tag: Tag::Structure,
            name: Some(name.to_string()),
            byte_size: Some(byte_size),
            declaration: false,
            type_index: None,
            members,
        }
    }

    fn member(name: &str, byte_offset: u64, type_index: TypeGraphIndex) -> Member {
        Member {
            name: name.to_string(),
            byte_offset: Some(byte_offset),
            type_index,
            linkage_name: None,
        }
    }

    fn int_type(graph: &mut TypeGraph) -> TypeGraphIndex {
        graph.push(TypeEntry {
            tag: Tag::Other,
            name: Some("int".to_string()),
            byte_size: Some(4),
            declaration: false,
            type_index: None,
            members: Vec::new(),
        })
    }

    fn route<'a>(path: &[&str], source: &str, op: Op, target: &'a mut i64) -> RouteNode<'a> {
        let mut node = RouteNode::new(path.iter().map(|s| s.to_string()).collect());
        node.extractors.push(layout_types::route::Extractor {
            source: source.to_string(),
            op,
            is_static: false,
            target,
        });
        node
    }

    /// Flat offsets within a single composite, plus whole-type size.
    #[test]
    fn flat_offsets_and_whole_type_size() {
        let mut graph = TypeGraph::new();
        let int_idx = int_type(&mut graph);
        let pad_idx = graph.push(TypeEntry {
            tag: Tag::Other,
            name: Some("char[16]".to_string()),
            byte_size: Some(16),
            declaration: false,
            type_index: None,
            members: Vec::new(),
        });
        graph.push(composite(
            "test_t",
            24,
            vec![
                member("a", 0, int_idx),
                member("b", 4, int_idx),
                member("pad", 8, pad_idx),
            ],
        ));

        let mut a = -1i64;
        let mut b = -1i64;
        let mut size = -1i64;
        let mut routes = vec![
            route(&["test_t"], "a", Op::OffsetOf, &mut a),
            route(&["test_t"], "b", Op::OffsetOf, &mut b),
            route(&["test_t"], "test_t", Op::SizeOf, &mut size),
        ];
        let outcomes = resolve_routes(&graph, &SymbolTable::new(), &mut routes).unwrap();
        assert_eq!(outcomes, vec![RouteOutcome::Resolved; 3]);
        assert_eq!(a, 0);
        assert_eq!(b, 4);
        assert_eq!(size, 24);
    }

    /// Three-deep nesting: offsets accumulate across hops.
    #[test]
    fn three_deep_accumulates_offset() {
        let mut graph = TypeGraph::new();
        let int_idx = int_type(&mut graph);
        let deeply_nested = graph.push(composite(
            "deeply_nested_t",
            8,
            vec![member("a", 0, int_idx), member("b", 4, int_idx)],
        ));
        let nested = graph.push(composite(
            "nested_t",
            16,
            vec![member("deeply_nested", 8, deeply_nested)],
        ));
        graph.push(composite(
            "test_t",
            24,
            vec![member("nested", 8, nested)],
        ));

        let mut a = -1i64;
        let mut b = -1i64;
        let mut routes = vec![
            route(&["test_t", "nested", "deeply_nested"], "a", Op::OffsetOf, &mut a),
            route(&["test_t", "nested", "deeply_nested"], "b", Op::OffsetOf, &mut b),
        ];
        resolve_routes(&graph, &SymbolTable::new(), &mut routes).unwrap();
        assert_eq!(a, 16);
        assert_eq!(b, 20);
    }

    /// Typedef indirection is transparent.
    #[test]
    fn typedef_indirection_resolves_through_alias() {
        let mut graph = TypeGraph::new();
        let int_idx = int_type(&mut graph);
        let structure = graph.push(composite("_foo", 4, vec![member("x", 0, int_idx)]));
        graph.push(TypeEntry {
            tag: Tag::Typedef,
            name: Some("foo_t".to_string()),
            byte_size: None,
            declaration: false,
            type_index: Some(structure),
            members: Vec::new(),
        });

        let mut x = -1i64;
        let mut routes = vec![route(&["foo_t"], "x", Op::OffsetOf, &mut x)];
        resolve_routes(&graph, &SymbolTable::new(), &mut routes).unwrap();
        assert_eq!(x, 0);
    }

    /// A declaration-only entry precedes the real definition; the real
    /// one wins.
    #[test]
    fn declaration_before_definition_picks_definition() {
        let mut graph = TypeGraph::new();
        let int_idx = int_type(&mut graph);
        graph.push(TypeEntry {
            tag: Tag::Structure,
            name: Some("test_t".to_string()),
            byte_size: None,
            declaration: true,
            type_index: None,
            members: Vec::new(),
        });
        graph.push(composite("test_t", 24, vec![member("a", 0, int_idx)]));

        let mut a = -1i64;
        let mut routes = vec![route(&["test_t"], "a", Op::OffsetOf, &mut a)];
        resolve_routes(&graph, &SymbolTable::new(), &mut routes).unwrap();
        assert_eq!(a, 0);
    }

    /// A missing type is a silent per-route skip, not an error, and
    /// does not block other routes.
    #[test]
    fn missing_type_is_silent_and_other_routes_still_resolve() {
        let mut graph = TypeGraph::new();
        let int_idx = int_type(&mut graph);
        graph.push(composite("test_t", 4, vec![member("a", 0, int_idx)]));

        let mut missing = -1i64;
        let mut a = -1i64;
        let mut routes = vec![
            route(&["does_not_exist_t"], "a", Op::OffsetOf, &mut missing),
            route(&["test_t"], "a", Op::OffsetOf, &mut a),
        ];
        let outcomes = resolve_routes(&graph, &SymbolTable::new(), &mut routes).unwrap();
        assert_eq!(outcomes[0], RouteOutcome::NotFound);
        assert_eq!(outcomes[1], RouteOutcome::Resolved);
        assert_eq!(missing, -1);
        assert_eq!(a, 0);
    }

    /// Entries exist for the head name but none are actionable: a hard
    /// error, distinct from "no entries at all".
    #[test]
    fn entries_present_but_none_actionable_is_resolution_failed() {
        let mut graph = TypeGraph::new();
        graph.push(TypeEntry {
            tag: Tag::Structure,
            name: Some("test_t".to_string()),
            byte_size: None,
            declaration: true,
            type_index: None,
            members: Vec::new(),
        });

        let mut a = -1i64;
        let mut routes = vec![route(&["test_t"], "a", Op::OffsetOf, &mut a)];
        let err = resolve_routes(&graph, &SymbolTable::new(), &mut routes).unwrap_err();
        assert!(matches!(err, ResolveError::ResolutionFailed { .. }));
    }

    /// A static member resolves through the symbol table.
    #[test]
    fn static_member_resolves_via_symbol_table() {
        let mut graph = TypeGraph::new();
        let int_idx = int_type(&mut graph);
        graph.push(composite(
            "MyClass",
            4,
            vec![Member {
                name: "s_instance_count".to_string(),
                byte_offset: None,
                type_index: int_idx,
                linkage_name: Some("_ZN7MyClass16s_instance_countE".to_string()),
            }],
        ));

        let mut symbols = SymbolTable::new();
        symbols.insert("_ZN7MyClass16s_instance_countE", 0x4040a0);

        let mut target = -1i64;
        let mut node = RouteNode::new(vec!["MyClass".to_string()]);
        node.extractors.push(layout_types::route::Extractor {
            source: "s_instance_count".to_string(),
            op: Op::OffsetOf,
            is_static: true,
            target: &mut target,
        });
        let mut routes = vec![node];
        resolve_routes(&graph, &symbols, &mut routes).unwrap();
        assert_eq!(target, 0x4040a0);
    }
}
