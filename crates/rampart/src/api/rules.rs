//! Merged rule view and reorder handlers.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use rampart_core::model::Policy;
use rampart_core::{Error as CoreError, Position, ReorderSpec, merged_policies};

use super::config::UpdateReply;
use super::{ApiError, AppState};

/// Explicit policies merged with the virtual zone-service policies
/// derived from zone settings.
pub async fn list_rules(State(state): State<AppState>) -> Json<Vec<Policy>> {
    let config = state.store.snapshot();
    Json(merged_policies(&config))
}

/// Reorder request. `new_order` replaces the whole ordering; otherwise
/// `position` and `relative_to` move one entry.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    #[serde(default)]
    pub policy_name: String,
    #[serde(default)]
    pub rule_name: String,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub relative_to: Option<String>,
    #[serde(default)]
    pub new_order: Option<Vec<String>>,
}

impl ReorderRequest {
    fn spec(&self, target: &str) -> Result<ReorderSpec, ApiError> {
        if let Some(order) = &self.new_order {
            return Ok(ReorderSpec::Wholesale(order.clone()));
        }
        let anchor = self.relative_to.as_deref().filter(|s| !s.is_empty());
        match (target.is_empty(), anchor) {
            (false, Some(anchor)) => Ok(ReorderSpec::Relative {
                target: target.to_owned(),
                position: self.position.unwrap_or_default(),
                anchor: anchor.to_owned(),
            }),
            _ => Err(ApiError::bad_request(
                "reorder needs either new_order or a target with relative_to",
            )),
        }
    }
}

pub async fn reorder_policies(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<UpdateReply>, ApiError> {
    let spec = req.spec(&req.policy_name)?;

    // Resolve names against a snapshot first so a miss is a 404, not a
    // silently dropped update.
    let mut probe = state.store.snapshot();
    rampart_core::reorder_policies(&mut probe.policies, &spec)?;

    let warnings = state.store.update(|config| {
        let _ = rampart_core::reorder_policies(&mut config.policies, &spec);
    })?;
    Ok(UpdateReply::ok(warnings))
}

pub async fn reorder_rules(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<UpdateReply>, ApiError> {
    if req.policy_name.is_empty() {
        return Err(ApiError::bad_request("policy_name is required"));
    }
    let spec = req.spec(&req.rule_name)?;

    let mut probe = state.store.snapshot();
    let policy = probe
        .policies
        .iter_mut()
        .find(|p| p.matches_identity(&req.policy_name))
        .ok_or_else(|| CoreError::not_found("policy", req.policy_name.clone()))?;
    rampart_core::reorder_rules(policy, &spec)?;

    let warnings = state.store.update(|config| {
        if let Some(policy) = config
            .policies
            .iter_mut()
            .find(|p| p.matches_identity(&req.policy_name))
        {
            let _ = rampart_core::reorder_rules(policy, &spec);
        }
    })?;
    Ok(UpdateReply::ok(warnings))
}
