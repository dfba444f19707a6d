// ── Apply orchestration ──
//
// The sequence is backup, apply, probe, then commit or roll back. A
// failed probe restores the pre-apply backup; a timed-out apply stops
// the sequence without rolling back, because the daemon's state is
// unknown and a blind restore could disrupt a ruleset that landed.

use std::net::IpAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use rampart_rpc::{DaemonClient, types::BackupInfo};

use crate::diff;
use crate::error::Error;
use crate::model::Config;
use crate::store::{ChangeEvent, StagedStore};

/// Per-target probe budget used when the caller does not set one.
pub const DEFAULT_PING_TIMEOUT_SECS: u64 = 5;

/// Phase labels for tracing one run of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
enum Phase {
    BackingUp,
    Applying,
    Probing,
    Committing,
    RollingBack,
    Done,
}

/// Outcome of one apply or safe-apply run.
///
/// `success` reflects whether the candidate configuration is running
/// when the sequence ends. A failed save leaves it running, so that
/// path reports success with a warning attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Version of the most recent backup taken during the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_version: Option<u64>,
    /// Present after a probe failure: whether the restore succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rolled_back: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_pings: Vec<String>,
}

/// Drives the backup, apply, probe, and commit-or-rollback sequence
/// against the daemon.
///
/// Runs are serialized on an internal async mutex, so two sequences
/// can never interleave their backups and restores. Validation
/// problems surface as [`Error::Validation`]; every orchestration
/// outcome, including failures, comes back as an [`ApplyReport`].
pub struct ApplyEngine {
    client: Arc<DaemonClient>,
    store: Arc<StagedStore>,
    gate: Mutex<()>,
}

impl ApplyEngine {
    pub fn new(client: Arc<DaemonClient>, store: Arc<StagedStore>) -> Self {
        Self {
            client,
            store,
            gate: Mutex::new(()),
        }
    }

    /// Apply the staged configuration without connectivity probing.
    pub async fn apply(&self) -> Result<ApplyReport, Error> {
        let candidate = self.store.snapshot();
        self.execute(candidate, &[], DEFAULT_PING_TIMEOUT_SECS).await
    }

    /// Apply `candidate`, then probe `ping_targets` through the new
    /// ruleset. Any failed probe restores the pre-apply backup.
    pub async fn safe_apply(
        &self,
        candidate: Config,
        ping_targets: &[String],
        ping_timeout_secs: u64,
    ) -> Result<ApplyReport, Error> {
        self.execute(candidate, ping_targets, ping_timeout_secs)
            .await
    }

    /// Drop staged edits on both sides: tell the daemon to discard,
    /// then resync the local staged cache from its clean view.
    pub async fn discard(&self) -> Result<(), Error> {
        let _guard = self.gate.lock().await;
        self.client.discard_config().await?;
        let clean: Config = self.client.get_config().await?;
        self.store.replace(clean);
        self.store.notify(ChangeEvent::StagedDiscarded);
        info!("staged configuration discarded");
        Ok(())
    }

    /// Unified diff of the daemon's running configuration against the
    /// staged one.
    pub async fn pending_diff(&self) -> Result<String, Error> {
        let running: Config = self.client.get_running_config().await?;
        Ok(diff::unified_diff(&running, &self.store.snapshot())?)
    }

    /// Whether the staged configuration structurally differs from the
    /// running one.
    pub async fn has_pending_changes(&self) -> Result<bool, Error> {
        let running: Config = self.client.get_running_config().await?;
        Ok(!diff::configs_equal(&running, &self.store.snapshot())?)
    }

    async fn execute(
        &self,
        candidate: Config,
        ping_targets: &[String],
        ping_timeout_secs: u64,
    ) -> Result<ApplyReport, Error> {
        // One sequence at a time; a second caller queues here.
        let _guard = self.gate.lock().await;

        candidate.validate().into_result()?;

        debug!(phase = %Phase::BackingUp, "creating pre-apply backup");
        let pre_backup = match self.client.create_backup("Pre-apply backup", false).await {
            Ok(info) => info,
            Err(e) => {
                error!("pre-apply backup failed: {e}");
                return Ok(ApplyReport {
                    success: false,
                    message: "Failed to create pre-apply backup".to_owned(),
                    error: Some(e.to_string()),
                    ..ApplyReport::default()
                });
            }
        };

        debug!(phase = %Phase::Applying, "pushing candidate configuration");
        if let Err(e) = self.client.apply_config(&candidate).await {
            let message = if e.is_timeout() {
                // Unknown outcome. The candidate may or may not be
                // live, so no restore is attempted.
                "Apply timed out; daemon state unknown, pre-apply backup retained"
            } else {
                "Apply failed"
            };
            error!("apply failed: {e}");
            return Ok(ApplyReport {
                success: false,
                message: message.to_owned(),
                error: Some(e.to_string()),
                backup_version: Some(pre_backup.version),
                ..ApplyReport::default()
            });
        }

        // The daemon is now running the candidate.
        self.store.replace(candidate);

        if !ping_targets.is_empty() {
            debug!(phase = %Phase::Probing, targets = ping_targets.len(), "verifying connectivity");
            let failed = self.probe(ping_targets, ping_timeout_secs).await;
            if !failed.is_empty() {
                return Ok(self.roll_back(&pre_backup, failed).await);
            }
        }

        debug!(phase = %Phase::Committing, "persisting configuration");
        if let Err(e) = self.client.save_config().await {
            warn!("config applied but save failed: {e}");
            return Ok(ApplyReport {
                success: true,
                message: "Configuration applied (runtime only - save failed)".to_owned(),
                warning: Some(format!("Config applied but failed to save to disk: {e}")),
                backup_version: Some(pre_backup.version),
                ..ApplyReport::default()
            });
        }

        let backup_version = match self.client.create_backup("Post-apply backup", false).await {
            Ok(info) => info.version,
            Err(e) => {
                warn!("post-apply backup failed: {e}");
                pre_backup.version
            }
        };

        self.store.notify(ChangeEvent::ConfigApplied);
        info!(phase = %Phase::Done, "configuration applied and saved");
        Ok(ApplyReport {
            success: true,
            message: "Configuration applied and saved".to_owned(),
            backup_version: Some(backup_version),
            ..ApplyReport::default()
        })
    }

    /// Probe every target, collecting failures instead of stopping at
    /// the first, so the report names them all.
    async fn probe(&self, targets: &[String], timeout_secs: u64) -> Vec<String> {
        let mut failed = Vec::new();
        for target in targets {
            if target.parse::<IpAddr>().is_err() {
                failed.push(format!("{target}: invalid IP address"));
                continue;
            }
            match self.client.ping(target, timeout_secs).await {
                Ok(reply) if reply.reachable => {
                    debug!("probe {target} ok ({:.1} ms)", reply.rtt_ms);
                }
                Ok(reply) => {
                    let detail = reply.error.unwrap_or_else(|| "unreachable".to_owned());
                    failed.push(format!("{target}: {detail}"));
                }
                Err(e) => failed.push(format!("{target}: {e}")),
            }
        }
        failed
    }

    async fn roll_back(&self, pre_backup: &BackupInfo, failed: Vec<String>) -> ApplyReport {
        warn!(phase = %Phase::RollingBack, failures = failed.len(), "connectivity verification failed");
        match self.client.restore_backup(pre_backup.version).await {
            Ok(()) => {
                info!("restored backup version {}", pre_backup.version);
                self.store.notify(ChangeEvent::RolledBack);
                ApplyReport {
                    success: false,
                    message: "Connectivity verification failed, rolled back to pre-apply backup"
                        .to_owned(),
                    error: Some("connectivity verification failed".to_owned()),
                    warning: None,
                    backup_version: Some(pre_backup.version),
                    rolled_back: Some(true),
                    failed_pings: failed,
                }
            }
            Err(e) => {
                // Worst case: the suspect ruleset stays live and the
                // restore did not take.
                error!("rollback failed after probe failure: {e}");
                ApplyReport {
                    success: false,
                    message: format!("Connectivity verification failed and rollback failed: {e}"),
                    error: Some("connectivity verification failed".to_owned()),
                    warning: None,
                    backup_version: Some(pre_backup.version),
                    rolled_back: Some(false),
                    failed_pings: failed,
                }
            }
        }
    }
}
