//! # fc-stats
//!
//! Dashboard statistics for fleetcheck.
//!
//! - [`StatsAggregator`] runs the count queries against a [`RecordStore`],
//!   derives repairs from checklist records and reconciles them with the
//!   repair ledger.
//! - [`StatsCache`] keeps one snapshot per tenant for a fixed TTL and
//!   collapses concurrent misses into a single recompute.
//!
//! Both take their collaborators through constructors: the store, the
//! [`Clock`], and for the cache, any [`StatsSource`].

pub mod aggregator;
pub mod cache;
pub mod clock;
pub mod error;
pub mod store;

pub use aggregator::StatsAggregator;
pub use cache::{StatsCache, StatsSource};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::StatsError;
pub use store::RecordStore;

#[cfg(test)]
mod testing;
