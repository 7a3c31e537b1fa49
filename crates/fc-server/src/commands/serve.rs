use std::sync::Arc;

use fc_api::AppState;
use fc_config::FleetConfig;
use fc_db::service::FleetService;
use fc_stats::SystemClock;

use crate::bootstrap::read_seed_file;
use crate::cli::root_commands::ServeArgs;

pub async fn handle(args: &ServeArgs, mut config: FleetConfig, service: Arc<FleetService>) -> anyhow::Result<()> {
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Some(path) = &args.seed {
        let seed = read_seed_file(path)?;
        service.seed_if_empty(seed).await?;
    }

    if config.database.is_in_memory() {
        tracing::warn!("serving from an in-memory database; nothing will be persisted");
    }
    tracing::info!(
        database = %config.database.path,
        ttl_secs = config.stats.ttl_secs,
        "starting fleetcheck"
    );

    let state = AppState::new(service, &config, Arc::new(SystemClock));
    fc_api::run_server(&config.server, state)
        .await
        .map_err(|e| anyhow::anyhow!("server failed: {e}"))
}
