// ── Engine errors ──

use thiserror::Error;

use crate::validate::ValidationErrors;

/// Errors produced by the policy engine and change-management layer.
#[derive(Debug, Error)]
pub enum Error {
    // ── Validation ───────────────────────────────────────────────────
    /// The candidate configuration failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    // ── Daemon RPC ───────────────────────────────────────────────────
    /// A call to the enforcement daemon failed or timed out.
    #[error(transparent)]
    Rpc(#[from] rampart_rpc::Error),

    // ── Lookup ───────────────────────────────────────────────────────
    /// A named entity the request referenced does not exist.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    // ── Input ────────────────────────────────────────────────────────
    /// The request itself is malformed.
    #[error("{message}")]
    InvalidInput { message: String },

    // ── Serialization ────────────────────────────────────────────────
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether this is an RPC timeout, i.e. the daemon's outcome is
    /// unknown rather than known-failed.
    pub fn is_rpc_timeout(&self) -> bool {
        matches!(self, Self::Rpc(rpc) if rpc.is_timeout())
    }
}
