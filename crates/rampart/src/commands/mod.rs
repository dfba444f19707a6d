//! Subcommand handlers.

pub mod diff;
pub mod serve;
pub mod simulate;
pub mod validate;

use std::path::Path;

use rampart_core::Config;

use crate::error::CliError;

/// Read a configuration document from disk and fill in default policy
/// names so every policy is addressable.
fn load_config_file(path: &Path) -> Result<Config, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let mut config: Config = serde_json::from_str(&raw).map_err(|source| CliError::ParseConfig {
        path: path.display().to_string(),
        source,
    })?;
    config.normalize_policies();
    Ok(config)
}
