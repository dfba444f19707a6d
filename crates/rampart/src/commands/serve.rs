//! `rampart serve` -- run the control-plane HTTP API.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use rampart_config::Settings;
use rampart_core::{ApplyEngine, ChangeEvent, Config, StagedStore};
use rampart_rpc::DaemonClient;

use crate::api::{self, AppState};
use crate::cli::ServeArgs;
use crate::error::CliError;

pub async fn handle(args: ServeArgs, settings: Settings) -> Result<(), CliError> {
    let settings = with_overrides(settings, &args)?;

    let client = DaemonClient::new(
        &settings.daemon.endpoint,
        &settings.daemon.transport(),
        settings.daemon.timeouts.rpc_timeouts(),
    )
    .map_err(CliError::from)?;
    let client = Arc::new(client);

    // Staging starts from whatever the daemon is running.
    let initial: Config = client.get_running_config().await?;
    info!(
        zones = initial.zones.len(),
        policies = initial.policies.len(),
        endpoint = %settings.daemon.endpoint,
        "loaded running configuration"
    );

    let store = Arc::new(StagedStore::new(initial));
    let engine = Arc::new(ApplyEngine::new(Arc::clone(&client), Arc::clone(&store)));

    // Push the retention limit down; the daemon owns pruning.
    if let Err(e) = client.set_max_backups(settings.backups.max_backups).await {
        warn!("failed to push backup retention to daemon: {e}");
    }

    log_change_events(&store);

    let state = AppState {
        client,
        store,
        engine,
    };
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&settings.listen).await?;
    info!(listen = %settings.listen, "control plane listening");
    axum::serve(listener, router).await?;
    Ok(())
}

/// CLI flags override the settings file; the result must still validate.
fn with_overrides(mut settings: Settings, args: &ServeArgs) -> Result<Settings, CliError> {
    if let Some(listen) = &args.listen {
        settings.listen = listen.clone();
    }
    if let Some(endpoint) = &args.daemon {
        settings.daemon.endpoint = endpoint.clone();
    }
    match settings.validate() {
        Ok(()) => Ok(settings),
        // A rejected override is a usage error, not a settings failure.
        Err(rampart_config::ConfigError::Validation { field, reason }) => {
            Err(CliError::Validation { field, reason })
        }
        Err(other) => Err(CliError::Settings { source: other }),
    }
}

/// Keep an audit trail of change events published by the HTTP handlers
/// and the apply engine.
fn log_change_events(store: &Arc<StagedStore>) {
    let mut events = store.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ChangeEvent::StagedUpdated) => info!("staged configuration updated"),
                Ok(ChangeEvent::StagedDiscarded) => info!("staged changes discarded"),
                Ok(ChangeEvent::ConfigApplied) => info!("configuration applied"),
                Ok(ChangeEvent::RolledBack) => {
                    warn!("configuration rolled back after failed connectivity probes");
                }
                Ok(ChangeEvent::BackupCreated) => info!("backup created"),
                Err(RecvError::Lagged(missed)) => {
                    warn!("change event log fell behind by {missed} events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
