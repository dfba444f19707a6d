use thiserror::Error;

/// Top-level error type for the `rampart-rpc` crate.
///
/// The taxonomy matters to callers: a `Timeout` means the outcome of the
/// operation is unknown (rampartd may or may not have completed it), while
/// a `Daemon` error means rampartd explicitly rejected or failed it.
/// `rampart-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, socket reset, etc.)
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint URL parsing error.
    #[error("Invalid daemon endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The per-operation deadline elapsed before rampartd answered.
    /// The underlying operation may still have completed on the daemon side.
    #[error("RPC '{operation}' timed out after {timeout_secs}s (outcome unknown)")]
    Timeout {
        operation: &'static str,
        timeout_secs: u64,
    },

    // ── Authentication ──────────────────────────────────────────────
    /// Shared-secret material could not be turned into a request header.
    #[error("Invalid control-socket token: {message}")]
    Auth { message: String },

    /// rampartd rejected the shared secret.
    #[error("Control socket rejected the shared secret")]
    Unauthorized,

    // ── Daemon ──────────────────────────────────────────────────────
    /// Structured error returned by rampartd: the operation definitely
    /// did not succeed.
    #[error("Daemon error (HTTP {status}): {message}")]
    Daemon {
        status: u16,
        message: String,
        code: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the operation's outcome is unknown (deadline
    /// elapsed without an answer). Callers must never treat this as
    /// success *or* as a confirmed failure of the underlying operation.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if rampartd could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }

    /// Extract the daemon's error code, if it sent one.
    pub fn daemon_code(&self) -> Option<&str> {
        match self {
            Self::Daemon { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
