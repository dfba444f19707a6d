//! CLI error types with miette diagnostics.
//!
//! Maps core, config, and RPC errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

/// Exit codes surfaced to service managers and scripts.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Settings ─────────────────────────────────────────────────────
    #[error("Could not load settings")]
    #[diagnostic(
        code(rampart::settings),
        help(
            "Check the settings file (default /etc/rampart/config.toml) and any\n\
             RAMPART_-prefixed environment variables."
        )
    )]
    Settings {
        #[source]
        source: rampart_config::ConfigError,
    },

    // ── Files ────────────────────────────────────────────────────────
    #[error("Could not read {path}")]
    #[diagnostic(code(rampart::read_file))]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid configuration document")]
    #[diagnostic(
        code(rampart::parse_config),
        help("The file must be a JSON configuration document.")
    )]
    ParseConfig {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON encoding failed")]
    #[diagnostic(code(rampart::encode))]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Configuration failed validation: {errors} error(s), {warnings} warning(s)")]
    #[diagnostic(code(rampart::validation_failed))]
    ValidationFailed { errors: usize, warnings: usize },

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(rampart::usage), help("Run with --help for accepted values."))]
    Validation { field: String, reason: String },

    // ── Daemon ───────────────────────────────────────────────────────
    #[error("rampartd did not answer within {timeout_secs}s ({operation})")]
    #[diagnostic(
        code(rampart::timeout),
        help(
            "The daemon may be busy reprogramming the packet filter.\n\
             Retry, or raise daemon.timeouts in the settings file."
        )
    )]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Could not talk to rampartd")]
    #[diagnostic(
        code(rampart::daemon),
        help(
            "Check that rampartd is running and that daemon.endpoint points at\n\
             its control socket (default http://127.0.0.1:9601)."
        )
    )]
    Daemon {
        #[source]
        source: rampart_rpc::Error,
    },

    // ── Server ───────────────────────────────────────────────────────
    #[error("HTTP server error")]
    #[diagnostic(code(rampart::server))]
    Server {
        #[source]
        source: std::io::Error,
    },
}

impl From<rampart_config::ConfigError> for CliError {
    fn from(source: rampart_config::ConfigError) -> Self {
        Self::Settings { source }
    }
}

impl From<rampart_rpc::Error> for CliError {
    fn from(source: rampart_rpc::Error) -> Self {
        match source {
            rampart_rpc::Error::Timeout {
                operation,
                timeout_secs,
            } => Self::Timeout {
                operation: operation.to_owned(),
                timeout_secs,
            },
            other => Self::Daemon { source: other },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(source: std::io::Error) -> Self {
        Self::Server { source }
    }
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => exit_code::USAGE,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Daemon { source } if source.is_unreachable() => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}
