//! The outer CLI parts of the `layout-extract` executable.

#![forbid(unsafe_code)]

mod args;

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use args::{Cli, Command};
use layout_extract::{error::DriverError, extract, merge};
use layout_types::{RuntimeFamily, Version};

use log::error;

fn main() -> ExitCode {
    let cli = match Cli::from_cli() {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), DriverError> {
    match command {
        Command::Extract {
            input,
            runtime,
            version,
            output,
        } => {
            let family = RuntimeFamily::from_str(&runtime).map_err(DriverError::UnknownFamily)?;
            let parsed_version =
                Version::from_str(&version).map_err(|_| DriverError::VersionParse(version))?;
            let request = extract::ExtractRequest {
                input,
                family,
                version: parsed_version,
                output_dir: output,
            };
            extract::run(&request)?;
            Ok(())
        }
        Command::Merge { inputs, output } => {
            let paths = resolve_inputs(inputs)?;
            merge::merge_files(&paths, &output)?;
            Ok(())
        }
    }
}

/// Expands a single glob-pattern argument or takes a list of explicit
/// paths verbatim, matching `mergelayout.go`'s input-resolution rule.
fn resolve_inputs(inputs: Vec<String>) -> Result<Vec<PathBuf>, DriverError> {
    if inputs.len() == 1 {
        let pattern = &inputs[0];
        log::info!("single input specified, using glob pattern {pattern:?}");
        let matches: Vec<PathBuf> = glob::glob(pattern)
            .map_err(|source| DriverError::Glob {
                pattern: pattern.clone(),
                source,
            })?
            .filter_map(Result::ok)
            .collect();
        if matches.is_empty() {
            return Err(DriverError::NoInputFiles(pattern.clone()));
        }
        Ok(matches)
    } else {
        Ok(inputs.into_iter().map(PathBuf::from).collect())
    }
}
