// Wire types for the rampartd control protocol.
//
// Configuration payloads are deliberately not modeled here: the daemon
// shares the control plane's configuration schema, so the config-bearing
// calls on `DaemonClient` are generic over the caller's serde types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Daemon liveness/status report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonStatus {
    pub version: String,
    pub uptime_secs: u64,
    /// Whether the daemon currently holds a loaded running configuration.
    #[serde(default)]
    pub config_loaded: bool,
}

/// Result of a privileged connectivity probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingReply {
    pub reachable: bool,
    /// Round-trip time in milliseconds; meaningful only when `reachable`.
    #[serde(default)]
    pub rtt_ms: f64,
    /// Daemon-side failure detail (resolution error, ICMP error, …).
    #[serde(default)]
    pub error: Option<String>,
}

/// Metadata for one stored configuration backup.
///
/// Content snapshots stay on the daemon side; fetch them with
/// [`crate::DaemonClient::get_backup_content`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    /// Monotonically increasing version number.
    pub version: u64,
    pub description: String,
    /// Pinned backups are exempt from retention pruning.
    #[serde(default)]
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub size_bytes: u64,
}

// ── Error response shape from the daemon ─────────────────────────────

#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
