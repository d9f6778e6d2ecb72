//! layout-dwarf
//! ============
//!
//! DWARF/ELF-backed debug-info resolver, decoupled from any driver
//! binary: an arena-indexed view over a binary's composite types
//! ([`graph`]), the `gimli`/`object` loader that builds one from a file
//! on disk ([`elf`]), the pure walking algorithm that satisfies routes
//! against it ([`resolver`]), and a GNU build-id reader ([`buildid`]).

#![forbid(unsafe_code)]

pub mod buildid;
pub mod elf;
pub mod error;
pub mod graph;
pub mod resolver;

pub use elf::{load, LoadedDebugInfo};
pub use error::ResolveError;
pub use graph::{Member, Tag, TypeEntry, TypeGraph, TypeGraphIndex};
pub use resolver::{resolve_routes, RouteOutcome, SymbolTable};
