//! HTTP surface of the control plane.
//!
//! Every route lives under `/api/v1`. Handlers read and stage through
//! the shared [`StagedStore`], and reach the daemon through the
//! [`DaemonClient`] or the [`ApplyEngine`].

pub mod backups;
pub mod config;
pub mod debug;
pub mod error;
pub mod health;
pub mod rules;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use rampart_core::{ApplyEngine, StagedStore};
use rampart_rpc::DaemonClient;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<DaemonClient>,
    pub store: Arc<StagedStore>,
    pub engine: Arc<ApplyEngine>,
}

/// Build the full router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Whole document and per-section staging
        .route("/config", get(config::get_config))
        .route(
            "/config/policies",
            get(config::get_policies).post(config::set_policies),
        )
        .route(
            "/config/zones",
            get(config::get_zones).post(config::set_zones),
        )
        .route(
            "/config/interfaces",
            get(config::get_interfaces).post(config::set_interfaces),
        )
        .route("/config/nat", get(config::get_nat).post(config::set_nat))
        .route(
            "/config/routes",
            get(config::get_routes).post(config::set_routes),
        )
        .route(
            "/config/ipsets",
            get(config::get_ipsets).post(config::set_ipsets),
        )
        .route(
            "/config/protections",
            get(config::get_protections).post(config::set_protections),
        )
        // Change lifecycle
        .route("/config/pending", get(config::get_pending))
        .route("/config/diff", get(config::get_diff))
        .route("/config/apply", post(config::apply))
        .route("/config/safe-apply", post(config::safe_apply))
        .route("/config/discard", post(config::discard))
        // Merged rule view and reordering
        .route("/rules", get(rules::list_rules))
        .route("/policies/reorder", post(rules::reorder_policies))
        .route("/rules/reorder", post(rules::reorder_rules))
        // Simulation
        .route("/debug/simulate-packet", post(debug::simulate_packet))
        // Backups
        .route("/backups", get(backups::list).post(backups::create))
        .route("/backups/restore", post(backups::restore))
        .route("/backups/content", get(backups::content))
        .route("/backups/pin", post(backups::pin))
        .route("/backups/settings", post(backups::settings))
        // Health
        .route("/health", get(health::health))
}
