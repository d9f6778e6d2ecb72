//! layout-extract
//! ==============
//!
//! The CLI driver: argument parsing, orchestration of descriptor →
//! resolver → output for a single binary (`extract`), and the merge
//! pass over a set of previously-extracted files (`merge`). Grounded on
//! `cargo-geiger`'s binary crate (`args.rs`/`scan.rs`/`main.rs`).

#![forbid(unsafe_code)]

/// Argument parsing
pub mod args;
/// Runtime-family version-bucket dispatch
pub mod dispatch;
/// Driver-level error aggregation
pub mod error;
/// The `extract` subcommand
pub mod extract;
/// Merges per-version layouts into semver-ranged records
pub mod merge;
/// File naming and (de)serialization
pub mod output;

pub use error::DriverError;
