mod api;
mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// `RUST_LOG` wins when set; otherwise verbosity flags map onto levels,
/// starting from `base` at zero.
fn init_tracing(verbosity: u8, base: &str) {
    let filter = match verbosity {
        0 => base,
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // The server takes its default log level from the settings file.
        Command::Serve(args) => {
            let settings = rampart_config::load_settings(cli.global.config.as_deref())?;
            init_tracing(cli.global.verbose, &settings.log.level);
            commands::serve::handle(args, settings).await
        }

        // Offline commands work on files and never touch the daemon
        Command::Validate(args) => {
            init_tracing(cli.global.verbose, "warn");
            commands::validate::handle(&args)
        }
        Command::Simulate(args) => {
            init_tracing(cli.global.verbose, "warn");
            commands::simulate::handle(&args)
        }
        Command::Diff(args) => {
            init_tracing(cli.global.verbose, "warn");
            commands::diff::handle(&args)
        }
    }
}
