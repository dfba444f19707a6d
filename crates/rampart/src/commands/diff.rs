//! `rampart diff` -- unified diff between two configuration files.

use rampart_core::diff::unified_diff;

use crate::cli::DiffArgs;
use crate::error::CliError;

pub fn handle(args: &DiffArgs) -> Result<(), CliError> {
    let running = super::load_config_file(&args.running)?;
    let staged = super::load_config_file(&args.staged)?;

    let text =
        unified_diff(&running, &staged).map_err(|source| CliError::Encode { source })?;
    println!("{text}");
    Ok(())
}
