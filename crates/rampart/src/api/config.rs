//! Staged-configuration handlers: per-section reads and writes, plus
//! the apply/discard lifecycle.
//!
//! Writes go through [`StagedStore::update`], so a section payload that
//! fails validation leaves the staged document untouched and comes back
//! as a 400 with the findings.
//!
//! [`StagedStore::update`]: rampart_core::StagedStore::update

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use rampart_core::model::{Interface, InterfaceProtection, IpSet, NatRule, Policy, Route, Zone};
use rampart_core::{ApplyReport, Config, DEFAULT_PING_TIMEOUT_SECS, ValidationError};

use super::{ApiError, AppState};

// ── Replies ─────────────────────────────────────────────────────────

/// Acknowledgement for staging writes; validation warnings ride along.
#[derive(Debug, Serialize)]
pub struct UpdateReply {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationError>,
}

impl UpdateReply {
    pub(super) fn ok(warnings: Vec<ValidationError>) -> Json<Self> {
        Json(Self {
            status: "ok",
            warnings,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PendingReply {
    pub has_changes: bool,
}

// ── Whole document ──────────────────────────────────────────────────

pub async fn get_config(State(state): State<AppState>) -> Json<Config> {
    Json(state.store.snapshot())
}

// ── Sections ────────────────────────────────────────────────────────

pub async fn get_policies(State(state): State<AppState>) -> Json<Vec<Policy>> {
    Json(state.store.snapshot().policies)
}

pub async fn set_policies(
    State(state): State<AppState>,
    Json(policies): Json<Vec<Policy>>,
) -> Result<Json<UpdateReply>, ApiError> {
    let warnings = state.store.update(|config| {
        config.policies = policies.clone();
        config.normalize_policies();
    })?;
    Ok(UpdateReply::ok(warnings))
}

pub async fn get_zones(State(state): State<AppState>) -> Json<Vec<Zone>> {
    Json(state.store.snapshot().zones)
}

pub async fn set_zones(
    State(state): State<AppState>,
    Json(zones): Json<Vec<Zone>>,
) -> Result<Json<UpdateReply>, ApiError> {
    let warnings = state.store.update(|config| {
        config.zones = zones.clone();
    })?;
    Ok(UpdateReply::ok(warnings))
}

pub async fn get_interfaces(State(state): State<AppState>) -> Json<Vec<Interface>> {
    Json(state.store.snapshot().interfaces)
}

pub async fn set_interfaces(
    State(state): State<AppState>,
    Json(interfaces): Json<Vec<Interface>>,
) -> Result<Json<UpdateReply>, ApiError> {
    let warnings = state.store.update(|config| {
        config.interfaces = interfaces.clone();
    })?;
    Ok(UpdateReply::ok(warnings))
}

pub async fn get_nat(State(state): State<AppState>) -> Json<Vec<NatRule>> {
    Json(state.store.snapshot().nat)
}

pub async fn set_nat(
    State(state): State<AppState>,
    Json(nat): Json<Vec<NatRule>>,
) -> Result<Json<UpdateReply>, ApiError> {
    let warnings = state.store.update(|config| {
        config.nat = nat.clone();
    })?;
    Ok(UpdateReply::ok(warnings))
}

pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<Route>> {
    Json(state.store.snapshot().routes)
}

pub async fn set_routes(
    State(state): State<AppState>,
    Json(routes): Json<Vec<Route>>,
) -> Result<Json<UpdateReply>, ApiError> {
    let warnings = state.store.update(|config| {
        config.routes = routes.clone();
    })?;
    Ok(UpdateReply::ok(warnings))
}

pub async fn get_ipsets(State(state): State<AppState>) -> Json<Vec<IpSet>> {
    Json(state.store.snapshot().ipsets)
}

pub async fn set_ipsets(
    State(state): State<AppState>,
    Json(ipsets): Json<Vec<IpSet>>,
) -> Result<Json<UpdateReply>, ApiError> {
    let warnings = state.store.update(|config| {
        config.ipsets = ipsets.clone();
    })?;
    Ok(UpdateReply::ok(warnings))
}

pub async fn get_protections(State(state): State<AppState>) -> Json<Vec<InterfaceProtection>> {
    Json(state.store.snapshot().protections)
}

pub async fn set_protections(
    State(state): State<AppState>,
    Json(protections): Json<Vec<InterfaceProtection>>,
) -> Result<Json<UpdateReply>, ApiError> {
    let warnings = state.store.update(|config| {
        config.protections = protections.clone();
    })?;
    Ok(UpdateReply::ok(warnings))
}

// ── Change lifecycle ────────────────────────────────────────────────

pub async fn get_pending(State(state): State<AppState>) -> Result<Json<PendingReply>, ApiError> {
    let has_changes = state.engine.has_pending_changes().await?;
    Ok(Json(PendingReply { has_changes }))
}

/// Unified diff as plain text, `"No changes."` when the staged document
/// matches the running one.
pub async fn get_diff(State(state): State<AppState>) -> Result<String, ApiError> {
    Ok(state.engine.pending_diff().await?)
}

pub async fn apply(State(state): State<AppState>) -> Result<Json<ApplyReport>, ApiError> {
    let run = Uuid::new_v4();
    info!(%run, "apply requested");
    let report = state.engine.apply().await?;
    info!(%run, success = report.success, "apply finished");
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct SafeApplyRequest {
    pub config: Config,
    #[serde(default)]
    pub ping_targets: Vec<String>,
    /// Per-target probe budget; zero means the default.
    #[serde(default)]
    pub ping_timeout_seconds: u64,
}

pub async fn safe_apply(
    State(state): State<AppState>,
    Json(req): Json<SafeApplyRequest>,
) -> Result<Json<ApplyReport>, ApiError> {
    let timeout = if req.ping_timeout_seconds == 0 {
        DEFAULT_PING_TIMEOUT_SECS
    } else {
        req.ping_timeout_seconds
    };

    let run = Uuid::new_v4();
    info!(%run, targets = req.ping_targets.len(), "safe apply requested");
    let report = state
        .engine
        .safe_apply(req.config, &req.ping_targets, timeout)
        .await?;
    info!(%run, success = report.success, rolled_back = ?report.rolled_back, "safe apply finished");
    Ok(Json(report))
}

pub async fn discard(State(state): State<AppState>) -> Result<Json<UpdateReply>, ApiError> {
    state.engine.discard().await?;
    Ok(UpdateReply::ok(Vec::new()))
}
