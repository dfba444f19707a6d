//! `rampart validate` -- offline structural validation.

use rampart_core::Severity;

use crate::cli::ValidateArgs;
use crate::error::CliError;

pub fn handle(args: &ValidateArgs) -> Result<(), CliError> {
    let config = super::load_config_file(&args.file)?;
    let findings = config.validate();

    if findings.is_empty() {
        println!("{}: OK", args.file.display());
        return Ok(());
    }

    let mut errors = 0usize;
    let mut warnings = 0usize;
    for finding in &findings {
        match finding.severity {
            Severity::Error => {
                errors += 1;
                println!("error: {finding}");
            }
            Severity::Warning => {
                warnings += 1;
                println!("warning: {finding}");
            }
        }
    }
    println!("{}: {errors} error(s), {warnings} warning(s)", args.file.display());

    if errors > 0 || (args.strict && warnings > 0) {
        return Err(CliError::ValidationFailed { errors, warnings });
    }
    Ok(())
}
