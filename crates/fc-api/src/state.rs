//! Application state for the API server

use std::sync::Arc;

use chrono::Duration;

use fc_config::{FleetConfig, GeneralConfig, MAX_TTL_SECS};
use fc_db::service::FleetService;
use fc_stats::{Clock, StatsAggregator, StatsCache};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<FleetService>,
    pub aggregator: Arc<StatsAggregator>,
    pub cache: Arc<StatsCache>,
    pub general: GeneralConfig,
    pub version: String,
}

impl AppState {
    /// Wire the aggregator and cache over one record store and clock.
    #[must_use]
    pub fn new(service: Arc<FleetService>, config: &FleetConfig, clock: Arc<dyn Clock>) -> Self {
        let aggregator = Arc::new(StatsAggregator::new(
            service.clone(),
            clock.clone(),
            config.stats.clone(),
        ));
        let ttl_secs = config.stats.ttl_secs.min(MAX_TTL_SECS);
        let ttl = Duration::seconds(i64::try_from(ttl_secs).unwrap_or(0));
        let cache = Arc::new(
            StatsCache::new(aggregator.clone(), clock, ttl)
                .serve_stale_on_error(config.stats.serve_stale_on_error),
        );

        Self {
            service,
            aggregator,
            cache,
            general: config.general.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
