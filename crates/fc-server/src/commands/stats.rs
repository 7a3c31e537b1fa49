use std::sync::Arc;

use fc_config::FleetConfig;
use fc_db::service::FleetService;
use fc_stats::{StatsAggregator, SystemClock};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StatsArgs;
use crate::output::output;

/// One aggregation pass, bypassing the cache.
pub async fn handle(
    args: &StatsArgs,
    config: &FleetConfig,
    service: Arc<FleetService>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let aggregator = StatsAggregator::new(service, Arc::new(SystemClock), config.stats.clone());
    let tenant = args.company.as_deref();

    if args.repairs {
        output(&aggregator.repairs(tenant).await?, flags.format)
    } else {
        output(&aggregator.compute(tenant).await?, flags.format)
    }
}
