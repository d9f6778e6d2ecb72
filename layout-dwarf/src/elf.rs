//! Loads an ELF file and its DWARF debug info into a [`TypeGraph`] plus
//! a [`SymbolTable`], using `gimli`/`object` — the same pairing
//! `other_examples` reaches for (`getsentry/symbolic`, `vmi-rs/isr`).
//! The teacher has no DWARF code of its own; this module is the
//! "enrich from the rest of the pack" case.
//!
//! Building the whole graph up front, instead of walking DIEs lazily
//! during resolution, is what lets [`crate::resolver`] operate without
//! ever touching a `gimli` reader again.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use gimli::{AttributeValue, DebugInfoOffset, EndianSlice, RunTimeEndian, SectionId, UnitOffset};
use object::{Object, ObjectSection, ObjectSymbol};

use crate::buildid;
use crate::error::ResolveError;
use crate::graph::{Member, Tag, TypeEntry, TypeGraph, TypeGraphIndex};
use crate::resolver::SymbolTable;

pub struct LoadedDebugInfo {
    pub graph: TypeGraph,
    pub symbols: SymbolTable,
    pub build_id: Option<String>,
}

/// Reads `path`, parses it as an ELF object, and builds the type graph
/// and symbol table the resolver needs. The only blocking operation in
/// the core: one bounded sequential file read.
pub fn load(path: &Path) -> Result<LoadedDebugInfo, ResolveError> {
    let data = fs::read(path)?;
    let object_file = object::File::parse(&*data)?;

    let build_id = buildid::read_build_id(&object_file);
    let symbols = load_symbols(&object_file);
    let graph = load_type_graph(&object_file)?;

    Ok(LoadedDebugInfo {
        graph,
        symbols,
        build_id,
    })
}

fn load_symbols<'data>(object_file: &impl Object<'data>) -> SymbolTable {
    let mut symbols = SymbolTable::new();
    for symbol in object_file.symbols() {
        if let Ok(name) = symbol.name() {
            if !name.is_empty() && symbol.address() != 0 {
                symbols.insert(name, symbol.address());
            }
        }
    }
    symbols
}

fn load_type_graph<'data>(
    object_file: &impl Object<'data>,
) -> Result<TypeGraph, ResolveError> {
    let endian = if object_file.is_little_endian() {
        RunTimeEndian::Little
    } else {
        RunTimeEndian::Big
    };

    let load_section = |id: SectionId| -> Result<Cow<'data, [u8]>, object::Error> {
        Ok(object_file
            .section_by_name(id.name())
            .map(|section| section.uncompressed_data())
            .transpose()?
            .unwrap_or(Cow::Borrowed(&[])))
    };
    let dwarf_cow = gimli::Dwarf::load(load_section)?;
    let dwarf = dwarf_cow.borrow(|section| EndianSlice::new(section, endian));

    let mut graph = TypeGraph::new();
    let mut offsets: HashMap<DebugInfoOffset, TypeGraphIndex> = HashMap::new();

    let mut unit_headers = dwarf.units();
    while let Some(header) = unit_headers.next()? {
        let unit = dwarf.unit(header)?;
        index_unit_entries(&dwarf, &unit, &mut graph, &mut offsets)?;
    }

    let mut unit_headers = dwarf.units();
    while let Some(header) = unit_headers.next()? {
        let unit = dwarf.unit(header)?;
        fill_unit_members(&dwarf, &unit, &mut graph, &mut offsets)?;
    }

    Ok(graph)
}

type Reader<'a> = EndianSlice<'a, RunTimeEndian>;

fn global_offset(unit_offset: UnitOffset, unit: &gimli::Unit<Reader<'_>>) -> Option<DebugInfoOffset> {
    unit_offset.to_debug_info_offset(&unit.header)
}

/// First pass: create one placeholder `TypeEntry` per DIE we care about
/// (structures, classes, typedefs, and anything with a byte-size we
/// might need to report back) so every later `type` reference has a
/// stable index to point at, regardless of visiting order.
fn index_unit_entries(
    dwarf: &gimli::Dwarf<Reader<'_>>,
    unit: &gimli::Unit<Reader<'_>>,
    graph: &mut TypeGraph,
    offsets: &mut HashMap<DebugInfoOffset, TypeGraphIndex>,
) -> Result<(), ResolveError> {
    let mut cursor = unit.entries();
    while let Some((_, entry)) = cursor.next_dfs()? {
        let tag = match entry.tag() {
            gimli::DW_TAG_structure_type => Tag::Structure,
            gimli::DW_TAG_class_type => Tag::Class,
            gimli::DW_TAG_typedef => Tag::Typedef,
            gimli::DW_TAG_base_type
            | gimli::DW_TAG_pointer_type
            | gimli::DW_TAG_const_type
            | gimli::DW_TAG_volatile_type
            | gimli::DW_TAG_array_type
            | gimli::DW_TAG_enumeration_type
            | gimli::DW_TAG_union_type => Tag::Other,
            _ => continue,
        };

        let Some(offset) = global_offset(entry.offset(), unit) else {
            continue;
        };
        if offsets.contains_key(&offset) {
            continue;
        }

        let name = entry_name(dwarf, unit, entry)?;
        let byte_size = entry
            .attr_value(gimli::DW_AT_byte_size)?
            .and_then(|v| v.udata_value());
        let declaration = matches!(
            entry.attr_value(gimli::DW_AT_declaration)?,
            Some(AttributeValue::Flag(true))
        );
        let has_children = entry.has_children();

        let index = graph.push(TypeEntry {
            tag,
            name,
            byte_size,
            declaration: declaration || !has_children && matches!(tag, Tag::Structure | Tag::Class),
            type_index: None,
            members: Vec::new(),
        });
        offsets.insert(offset, index);
    }
    Ok(())
}

/// Second pass: now that every type DIE has an index, resolve `type`
/// references (typedef targets, member types) and attach member lists
/// to their owning composite.
fn fill_unit_members(
    dwarf: &gimli::Dwarf<Reader<'_>>,
    unit: &gimli::Unit<Reader<'_>>,
    graph: &mut TypeGraph,
    offsets: &mut HashMap<DebugInfoOffset, TypeGraphIndex>,
) -> Result<(), ResolveError> {
    let mut cursor = unit.entries();
    // (index, depth) pairs — depth is the DIE depth the composite itself
    // sits at, not the stack length, so a member is only attributed to
    // its innermost *currently open* composite regardless of how many
    // non-composite DIEs (or nothing at all) came between them.
    let mut composite_stack: Vec<(TypeGraphIndex, isize)> = Vec::new();
    let mut depth: isize = 0;

    while let Some((delta, entry)) = cursor.next_dfs()? {
        depth += delta;
        while composite_stack
            .last()
            .is_some_and(|&(_, pushed_depth)| pushed_depth >= depth)
        {
            composite_stack.pop();
        }

        match entry.tag() {
            gimli::DW_TAG_typedef => {
                if let Some(&self_index) = global_offset(entry.offset(), unit)
                    .as_ref()
                    .and_then(|o| offsets.get(o))
                {
                    if let Some(target) = resolve_type_attr(entry, unit, graph, offsets)? {
                        graph.set_type_index(self_index, target);
                    }
                }
            }
            gimli::DW_TAG_structure_type | gimli::DW_TAG_class_type => {
                if let Some(&self_index) = global_offset(entry.offset(), unit)
                    .as_ref()
                    .and_then(|o| offsets.get(o))
                {
                    composite_stack.push((self_index, depth));
                }
            }
            gimli::DW_TAG_member => {
                if let Some(&(owner, _)) = composite_stack.last() {
                    let name = entry_name(dwarf, unit, entry)?.unwrap_or_default();
                    let byte_offset = entry
                        .attr_value(gimli::DW_AT_data_member_location)?
                        .and_then(|v| v.udata_value());
                    let linkage_name = entry_linkage_name(dwarf, unit, entry)?;
                    if let Some(type_index) = resolve_type_attr(entry, unit, graph, offsets)? {
                        graph.push_member(
                            owner,
                            Member {
                                name,
                                byte_offset,
                                type_index,
                                linkage_name,
                            },
                        );
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn resolve_type_attr(
    entry: &gimli::DebuggingInformationEntry<'_, '_, Reader<'_>>,
    unit: &gimli::Unit<Reader<'_>>,
    graph: &mut TypeGraph,
    offsets: &mut HashMap<DebugInfoOffset, TypeGraphIndex>,
) -> Result<Option<TypeGraphIndex>, ResolveError> {
    let Some(attr) = entry.attr_value(gimli::DW_AT_type)? else {
        return Ok(None);
    };
    let target_offset = match attr {
        AttributeValue::UnitRef(unit_offset) => global_offset(unit_offset, unit),
        AttributeValue::DebugInfoRef(offset) => Some(offset),
        _ => None,
    };
    let Some(target_offset) = target_offset else {
        return Ok(None);
    };

    if let Some(&index) = offsets.get(&target_offset) {
        return Ok(Some(index));
    }

    // Referenced a DIE the first pass didn't index (e.g. a type in a
    // unit we haven't visited yet, or a tag we don't model). Create a
    // byte-size-less placeholder rather than failing the whole unit.
    let index = graph.push(TypeEntry {
        tag: Tag::Other,
        name: None,
        byte_size: None,
        declaration: false,
        type_index: None,
        members: Vec::new(),
    });
    offsets.insert(target_offset, index);
    Ok(Some(index))
}

fn entry_name(
    dwarf: &gimli::Dwarf<Reader<'_>>,
    unit: &gimli::Unit<Reader<'_>>,
    entry: &gimli::DebuggingInformationEntry<'_, '_, Reader<'_>>,
) -> Result<Option<String>, ResolveError> {
    match entry.attr_value(gimli::DW_AT_name)? {
        Some(value) => {
            let r = dwarf.attr_string(unit, value)?;
            Ok(Some(r.to_string_lossy().into_owned()))
        }
        None => Ok(None),
    }
}

fn entry_linkage_name(
    dwarf: &gimli::Dwarf<Reader<'_>>,
    unit: &gimli::Unit<Reader<'_>>,
    entry: &gimli::DebuggingInformationEntry<'_, '_, Reader<'_>>,
) -> Result<Option<String>, ResolveError> {
    match entry.attr_value(gimli::DW_AT_linkage_name)? {
        Some(value) => {
            let r = dwarf.attr_string(unit, value)?;
            Ok(Some(r.to_string_lossy().into_owned()))
        }
        None => Ok(None),
    }
}

