//! Packet verdict simulation over the staged configuration.

use std::net::IpAddr;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use rampart_core::model::Protocol;
use rampart_core::{PacketQuery, Verdict, evaluate};

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub src_ip: String,
    pub dst_ip: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub dest_port: Option<u16>,
    /// Optional zone overrides; omitted zones are resolved from the
    /// configuration.
    #[serde(default)]
    pub src_zone: Option<String>,
    #[serde(default)]
    pub dst_zone: Option<String>,
}

pub async fn simulate_packet(
    State(state): State<AppState>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<Verdict>, ApiError> {
    let src_ip = parse_ip("src_ip", &req.src_ip)?;
    let dst_ip = parse_ip("dst_ip", &req.dst_ip)?;
    let protocol = parse_protocol(&req.protocol)?;

    let query = PacketQuery {
        src_ip,
        dst_ip,
        protocol,
        dest_port: req.dest_port,
        src_zone: req.src_zone,
        dst_zone: req.dst_zone,
    };
    let config = state.store.snapshot();
    Ok(Json(evaluate(&config, &query)))
}

fn parse_ip(field: &str, raw: &str) -> Result<IpAddr, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid {field}: {raw}")))
}

/// An omitted protocol simulates TCP.
fn parse_protocol(raw: &str) -> Result<Protocol, ApiError> {
    if raw.is_empty() {
        return Ok(Protocol::Tcp);
    }
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid protocol: {raw}")))
}
