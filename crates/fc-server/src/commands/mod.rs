use std::sync::Arc;

use anyhow::Context;

use fc_config::FleetConfig;
use fc_db::service::FleetService;

use crate::cli::{Commands, GlobalFlags};

mod seed;
mod serve;
mod stats;

pub async fn dispatch(command: Commands, config: FleetConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = open_service(&config).await?;
    match command {
        Commands::Serve(args) => serve::handle(&args, config, service).await,
        Commands::Stats(args) => stats::handle(&args, &config, service, flags).await,
        Commands::Seed(args) => seed::handle(&args, &service, flags).await,
        Commands::Backfill => {
            let report = service.normalize_categories().await?;
            crate::output::output(&report, flags.format)
        }
    }
}

async fn open_service(config: &FleetConfig) -> anyhow::Result<Arc<FleetService>> {
    let service = FleetService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))?;
    Ok(Arc::new(service))
}
