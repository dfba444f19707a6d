//! Liveness and daemon reachability.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReply {
    pub status: &'static str,
    pub version: &'static str,
    pub daemon: DaemonHealth,
}

#[derive(Debug, Serialize)]
pub struct DaemonHealth {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Always 200: the control plane itself is alive. Daemon trouble is
/// reported in the body so probes can alert without restarting us.
pub async fn health(State(state): State<AppState>) -> Json<HealthReply> {
    let daemon = match state.client.status().await {
        Ok(status) => DaemonHealth {
            reachable: true,
            version: Some(status.version),
            error: None,
        },
        Err(e) => DaemonHealth {
            reachable: false,
            version: None,
            error: Some(e.to_string()),
        },
    };

    Json(HealthReply {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        daemon,
    })
}
