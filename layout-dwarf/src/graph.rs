//! An arena-indexed view over a debug-info type universe.
//!
//! DWARF's `type` attributes are offsets back into the same section, so
//! the type graph is cyclic and heavily shared. Rather than keep
//! `gimli` cursors or readers alive across the walk, [`elf::load`]
//! copies every entry of interest into this arena once, up front, and
//! the resolver operates purely on `TypeGraphIndex` values afterwards —
//! the same "explicit iterative descent with an offset-indexed node
//! store" the design calls for.

/// An index into a [`TypeGraph`]'s arena. Stable for the graph's
/// lifetime; never invalidated by further pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeGraphIndex(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Structure,
    Class,
    Typedef,
    /// Anything else debug info can name: base types, pointers,
    /// enums, … — only their `byte_size` is ever read back out.
    Other,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    /// `DW_AT_data_member_location`. Absent for static data members.
    pub byte_offset: Option<u64>,
    pub type_index: TypeGraphIndex,
    /// `DW_AT_linkage_name`, read only for members that might be
    /// static-member candidates.
    pub linkage_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub tag: Tag,
    pub name: Option<String>,
    pub byte_size: Option<u64>,
    /// `DW_AT_declaration` present and true: a forward declaration with
    /// no member list, never actionable on its own.
    pub declaration: bool,
    /// For `Tag::Typedef`: the aliased type. `None` for anything else.
    pub type_index: Option<TypeGraphIndex>,
    pub members: Vec<Member>,
}

impl TypeEntry {
    pub fn is_composite(&self) -> bool {
        matches!(self.tag, Tag::Structure | Tag::Class)
    }
}

#[derive(Debug, Default)]
pub struct TypeGraph {
    entries: Vec<TypeEntry>,
}

impl TypeGraph {
    pub fn new() -> Self {
        TypeGraph {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: TypeEntry) -> TypeGraphIndex {
        self.entries.push(entry);
        TypeGraphIndex(self.entries.len() - 1)
    }

    pub fn get(&self, index: TypeGraphIndex) -> &TypeEntry {
        &self.entries[index.0]
    }

    /// Fills in a typedef's target after both sides of the reference
    /// have an index (elf.rs's second pass).
    pub fn set_type_index(&mut self, index: TypeGraphIndex, target: TypeGraphIndex) {
        self.entries[index.0].type_index = Some(target);
    }

    /// Attaches a member to its owning composite entry.
    pub fn push_member(&mut self, owner: TypeGraphIndex, member: Member) {
        self.entries[owner.0].members.push(member);
    }

    /// Every entry whose `name` equals `name`, in the order they were
    /// pushed (debug-info reading order — "first actionable one wins").
    pub fn find_by_name(&self, name: &str) -> Vec<TypeGraphIndex> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.name.as_deref() == Some(name))
            .map(|(i, _)| TypeGraphIndex(i))
            .collect()
    }

    /// Follows `Typedef` entries until a non-typedef is reached. Returns
    /// `None` only if a typedef's target index is somehow out of range,
    /// which never happens for a graph built by [`crate::elf`].
    pub fn chase_typedefs(&self, mut index: TypeGraphIndex) -> TypeGraphIndex {
        while let Tag::Typedef = self.get(index).tag {
            match self.get(index).type_index {
                Some(next) => index = next,
                None => break,
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(name: &str, byte_size: u64) -> TypeEntry {
        TypeEntry {
            tag: Tag::Other,
            name: Some(name.to_string()),
            byte_size: Some(byte_size),
            declaration: false,
            type_index: None,
            members: Vec::new(),
        }
    }

    #[test]
    fn find_by_name_preserves_insertion_order() {
        let mut graph = TypeGraph::new();
        let first = graph.push(TypeEntry {
            declaration: true,
            ..base("test_t", 0)
        });
        let second = graph.push(base("test_t", 24));
        assert_eq!(graph.find_by_name("test_t"), vec![first, second]);
        assert!(!graph.get(second).declaration);
    }

    #[test]
    fn chase_typedefs_follows_chain_to_composite() {
        let mut graph = TypeGraph::new();
        let structure = graph.push(TypeEntry {
            tag: Tag::Structure,
            ..base("_foo", 4)
        });
        let alias = graph.push(TypeEntry {
            tag: Tag::Typedef,
            type_index: Some(structure),
            ..base("foo_t", 0)
        });
        assert_eq!(graph.chase_typedefs(alias), structure);
    }
}
