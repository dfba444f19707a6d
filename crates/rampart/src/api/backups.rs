//! Backup handlers. The daemon owns backup storage; these proxy its
//! control calls and keep the staged document in sync after restores.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use rampart_core::{ChangeEvent, Config};
use rampart_rpc::types::BackupInfo;

use super::config::UpdateReply;
use super::{ApiError, AppState};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<BackupInfo>>, ApiError> {
    Ok(Json(state.client.list_backups().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pinned: bool,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<Json<BackupInfo>, ApiError> {
    let info = state
        .client
        .create_backup(&req.description, req.pinned)
        .await?;
    state.store.notify(ChangeEvent::BackupCreated);
    Ok(Json(info))
}

#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    pub version: u64,
}

/// Restore a backup on the daemon, then resync the staged document so
/// both sides see the restored state.
pub async fn restore(
    State(state): State<AppState>,
    Json(req): Json<RestoreRequest>,
) -> Result<Json<UpdateReply>, ApiError> {
    state.client.restore_backup(req.version).await?;
    let restored: Config = state.client.get_running_config().await?;
    state.store.replace(restored);
    state.store.notify(ChangeEvent::ConfigApplied);
    Ok(UpdateReply::ok(Vec::new()))
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub version: u64,
}

pub async fn content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> Result<String, ApiError> {
    Ok(state.client.get_backup_content(query.version).await?)
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub version: u64,
    pub pinned: bool,
}

pub async fn pin(
    State(state): State<AppState>,
    Json(req): Json<PinRequest>,
) -> Result<Json<UpdateReply>, ApiError> {
    state.client.pin_backup(req.version, req.pinned).await?;
    Ok(UpdateReply::ok(Vec::new()))
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub max_backups: u32,
}

pub async fn settings(
    State(state): State<AppState>,
    Json(req): Json<SettingsRequest>,
) -> Result<Json<UpdateReply>, ApiError> {
    if req.max_backups == 0 {
        return Err(ApiError::bad_request("max_backups must be at least 1"));
    }
    state.client.set_max_backups(req.max_backups).await?;
    Ok(UpdateReply::ok(Vec::new()))
}
