//! CLI argument parsing.
//!
//! Mirrors `cargo-geiger/src/args.rs`'s `clap` derive shape: a top-level
//! struct flattening a shared verbosity flag alongside a subcommand
//! enum, generalized to this tool's two subcommands instead of one.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(name = "layout-extract")]
#[clap(about, author, version)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn from_cli() -> Result<Self, clap::Error> {
        Cli::try_parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract struct layouts from a shared library's debug info.
    Extract {
        /// Path to the ELF shared library to read debug info from.
        input: PathBuf,

        /// Runtime family to extract: python, ruby, or glibc.
        #[clap(short, long)]
        runtime: String,

        /// Version to stamp the output with, e.g. 3.11.2.
        #[clap(short, long)]
        version: String,

        /// Directory to write the output file into.
        #[clap(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Merge per-version layout files into semver-ranged records.
    Merge {
        /// Input layout files. A single argument is treated as a glob
        /// pattern (matching `mergelayout`'s behavior); multiple
        /// arguments are treated as explicit paths.
        inputs: Vec<String>,

        /// Directory to write merged output files into.
        #[clap(short, long, default_value = ".")]
        output: PathBuf,
    },
}
