//! Per-tenant TTL cache for dashboard snapshots.
//!
//! Each tenant key (`Some(company_id)`, or `None` for the all-tenant view) has
//! its own async mutex slot. A `get` holds the slot across the recompute, so
//! concurrent misses on one key wait for the first caller's result instead
//! of recomputing. The slot map itself is a plain mutex held only long
//! enough to find or insert a slot.
//!
//! A recompute that fails or is cancelled writes nothing: the previous
//! snapshot, stale or not, stays where it was.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use fc_core::responses::StatsSnapshot;

use crate::clock::Clock;
use crate::error::StatsError;

/// Anything that can produce a fresh snapshot for a tenant.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn compute(&self, tenant: Option<&str>) -> Result<StatsSnapshot, StatsError>;
}

type TenantKey = Option<String>;
type Slot = Arc<tokio::sync::Mutex<Option<Arc<StatsSnapshot>>>>;

pub struct StatsCache {
    source: Arc<dyn StatsSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    serve_stale_on_error: bool,
    slots: Mutex<HashMap<TenantKey, Slot>>,
    /// Last successful snapshot per key. Survives invalidation.
    last_good: Mutex<HashMap<TenantKey, Arc<StatsSnapshot>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StatsCache {
    #[must_use]
    pub fn new(source: Arc<dyn StatsSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            serve_stale_on_error: false,
            slots: Mutex::new(HashMap::new()),
            last_good: Mutex::new(HashMap::new()),
        }
    }

    /// When a recompute fails, answer with the last good snapshot if there is one.
    #[must_use]
    pub const fn serve_stale_on_error(mut self, enabled: bool) -> Self {
        self.serve_stale_on_error = enabled;
        self
    }

    fn slot(&self, key: &TenantKey) -> Slot {
        lock(&self.slots).entry(key.clone()).or_default().clone()
    }

    /// Fresh snapshot for a tenant, recomputing at most once per expiry.
    ///
    /// # Errors
    ///
    /// Returns the source's error when a recompute fails, unless stale
    /// serving is enabled and a previous snapshot exists.
    pub async fn get(&self, tenant: Option<&str>) -> Result<Arc<StatsSnapshot>, StatsError> {
        let key: TenantKey = tenant.map(String::from);
        let slot = self.slot(&key);
        let mut cached = slot.lock().await;

        if let Some(snapshot) = cached.as_ref() {
            if snapshot
                .expires_at
                .is_some_and(|expires| self.clock.now() < expires)
            {
                tracing::debug!(tenant = tenant.unwrap_or("*"), "stats cache hit");
                return Ok(Arc::clone(snapshot));
            }
        }
        tracing::debug!(tenant = tenant.unwrap_or("*"), "stats cache miss");

        match self.source.compute(tenant).await {
            Ok(mut snapshot) => {
                let now = self.clock.now();
                snapshot.expires_at = Some(
                    now.checked_add_signed(self.ttl)
                        .unwrap_or(DateTime::<Utc>::MAX_UTC),
                );
                let snapshot = Arc::new(snapshot);
                *cached = Some(Arc::clone(&snapshot));
                lock(&self.last_good).insert(key, Arc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(tenant = tenant.unwrap_or("*"), error = %e, "stats recompute failed");
                if self.serve_stale_on_error {
                    if let Some(previous) = self.last_known_good(tenant) {
                        tracing::warn!(
                            tenant = tenant.unwrap_or("*"),
                            computed_at = %previous.computed_at,
                            "serving stale stats snapshot"
                        );
                        return Ok(previous);
                    }
                }
                Err(e)
            }
        }
    }

    /// Drop cached snapshots so the next `get` recomputes.
    ///
    /// `Some(tenant)` drops that tenant and the all-tenant view, which
    /// includes the tenant's records. `None` drops every key.
    pub fn invalidate(&self, tenant: Option<&str>) {
        let mut slots = lock(&self.slots);
        match tenant {
            Some(t) => {
                slots.remove(&Some(t.to_string()));
                slots.remove(&None);
            }
            None => slots.clear(),
        }
        tracing::debug!(tenant = tenant.unwrap_or("*"), "stats cache invalidated");
    }

    /// Most recent successful snapshot for a tenant, however old.
    #[must_use]
    pub fn last_known_good(&self, tenant: Option<&str>) -> Option<Arc<StatsSnapshot>> {
        lock(&self.last_good)
            .get(&tenant.map(String::from))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::testing::CountingSource;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn setup(source: CountingSource) -> (Arc<CountingSource>, Arc<ManualClock>, StatsCache) {
        let source = Arc::new(source);
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 1, 3, 9, 0, 0).unwrap(),
        ));
        let cache = StatsCache::new(source.clone(), clock.clone(), Duration::seconds(300));
        (source, clock, cache)
    }

    #[tokio::test]
    async fn fresh_hit_returns_same_snapshot() {
        let (source, clock, cache) = setup(CountingSource::default());
        let first = cache.get(Some("acme")).await.unwrap();
        clock.advance(Duration::seconds(299));
        let second = cache.get(Some("acme")).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.calls(), 1);
        assert_eq!(
            first.expires_at,
            Some(Utc.with_ymd_and_hms(2026, 1, 3, 9, 5, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn expiry_triggers_exactly_one_recompute() {
        let (source, clock, cache) = setup(CountingSource::default());
        cache.get(None).await.unwrap();
        clock.advance(Duration::seconds(300));

        let refreshed = cache.get(None).await.unwrap();
        cache.get(None).await.unwrap();
        assert_eq!(source.calls(), 2);
        assert_eq!(refreshed.total_completed, 2);
    }

    #[tokio::test]
    async fn tenants_are_cached_separately() {
        let (source, _clock, cache) = setup(CountingSource::default());
        cache.get(Some("a")).await.unwrap();
        cache.get(Some("b")).await.unwrap();
        cache.get(None).await.unwrap();
        cache.get(Some("a")).await.unwrap();
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn invalidate_forces_recompute_within_ttl() {
        let (source, _clock, cache) = setup(CountingSource::default());
        cache.get(Some("a")).await.unwrap();
        cache.get(Some("b")).await.unwrap();
        cache.get(None).await.unwrap();

        cache.invalidate(Some("a"));
        cache.get(Some("a")).await.unwrap();
        cache.get(Some("b")).await.unwrap();
        cache.get(None).await.unwrap();
        // "a" and the all-tenant view recomputed, "b" did not.
        assert_eq!(source.calls(), 5);

        cache.invalidate(None);
        cache.get(Some("b")).await.unwrap();
        assert_eq!(source.calls(), 6);
    }

    #[tokio::test]
    async fn concurrent_misses_collapse_into_one_compute() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let (source, _clock, cache) = setup(CountingSource::gated(gate.clone()));
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get(Some("acme")).await.unwrap() })
            })
            .collect();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        gate.notify_one();

        let mut snapshots = Vec::new();
        for h in handles {
            snapshots.push(h.await.unwrap());
        }
        assert_eq!(source.calls(), 1);
        assert!(snapshots.iter().all(|s| Arc::ptr_eq(s, &snapshots[0])));
    }

    #[tokio::test]
    async fn failure_keeps_previous_entry() {
        let (source, clock, cache) = setup(CountingSource::default());
        let good = cache.get(None).await.unwrap();
        clock.advance(Duration::seconds(600));

        source.fail(true);
        assert!(cache.get(None).await.is_err());
        let kept = cache.last_known_good(None).unwrap();
        assert!(Arc::ptr_eq(&good, &kept));

        source.fail(false);
        let recovered = cache.get(None).await.unwrap();
        assert_eq!(recovered.total_completed, 3);
    }

    #[tokio::test]
    async fn stale_served_on_error_when_enabled() {
        let (source, clock, cache) = setup(CountingSource::default());
        let cache = cache.serve_stale_on_error(true);
        let good = cache.get(None).await.unwrap();
        clock.advance(Duration::seconds(600));

        source.fail(true);
        let served = cache.get(None).await.unwrap();
        assert!(Arc::ptr_eq(&good, &served));
    }

    #[tokio::test]
    async fn error_without_history_propagates_even_with_stale_serving() {
        let (source, _clock, cache) = setup(CountingSource::default());
        let cache = cache.serve_stale_on_error(true);
        source.fail(true);
        assert!(cache.get(Some("new")).await.is_err());
        assert!(cache.last_known_good(Some("new")).is_none());
    }

    #[tokio::test]
    async fn cancelled_compute_writes_nothing() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let (source, _clock, cache) = setup(CountingSource::gated(gate.clone()));
        let cache = Arc::new(cache);

        let pending = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get(None).await })
        };
        while source.calls() == 0 {
            tokio::task::yield_now().await;
        }
        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());
        assert!(cache.last_known_good(None).is_none());

        gate.notify_one();
        cache.get(None).await.unwrap();
        assert_eq!(source.calls(), 2);
    }
}
