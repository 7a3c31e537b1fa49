//! Dashboard statistics configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Snapshot freshness window, in seconds.
const fn default_ttl_secs() -> u64 {
    300
}

/// Rolling window scanned for derived repairs, in days.
const fn default_repair_window_days() -> u32 {
    90
}

/// Rolling window for pending machine additions, in days.
const fn default_machine_addition_window_days() -> u32 {
    30
}

/// Maximum records fetched when deriving repairs.
const fn default_repair_scan_limit() -> u32 {
    5000
}

/// Maximum records fetched for today's bucket breakdown.
const fn default_today_scan_limit() -> u32 {
    2000
}

/// Longest accepted snapshot freshness window (one day).
pub const MAX_TTL_SECS: u64 = 86_400;

/// Longest accepted rolling window (about ten years).
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Maps a machine make to a dashboard bucket.
///
/// `make_contains` matches case-insensitively anywhere in the make.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BucketRule {
    pub make_contains: String,
    pub bucket: String,
}

impl BucketRule {
    fn new(make_contains: &str, bucket: &str) -> Self {
        Self {
            make_contains: make_contains.to_string(),
            bucket: bucket.to_string(),
        }
    }
}

fn default_buckets() -> Vec<BucketRule> {
    vec![
        BucketRule::new("jcb", "Loadall"),
        BucketRule::new("toyota", "Forklift"),
        BucketRule::new("daewoo", "Forklift"),
        BucketRule::new("cat", "Forklift"),
        BucketRule::new("john deere", "Tractor"),
        BucketRule::new("grimme", "Harvester"),
        BucketRule::new("standen", "Harvester"),
    ]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_repair_window_days")]
    pub repair_window_days: u32,

    #[serde(default = "default_machine_addition_window_days")]
    pub machine_addition_window_days: u32,

    #[serde(default = "default_repair_scan_limit")]
    pub repair_scan_limit: u32,

    #[serde(default = "default_today_scan_limit")]
    pub today_scan_limit: u32,

    /// When a recompute fails, serve the last snapshot instead of an error.
    #[serde(default)]
    pub serve_stale_on_error: bool,

    /// Ordered rules; the first match wins.
    #[serde(default = "default_buckets")]
    pub buckets: Vec<BucketRule>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            repair_window_days: default_repair_window_days(),
            machine_addition_window_days: default_machine_addition_window_days(),
            repair_scan_limit: default_repair_scan_limit(),
            today_scan_limit: default_today_scan_limit(),
            serve_stale_on_error: false,
            buckets: default_buckets(),
        }
    }
}

impl StatsConfig {
    /// Reject values that would make the dashboard unbounded or useless.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::InvalidValue {
            field: format!("stats.{field}"),
            reason: reason.to_string(),
        };
        if self.ttl_secs == 0 {
            return Err(invalid("ttl_secs", "must be greater than zero"));
        }
        if self.ttl_secs > MAX_TTL_SECS {
            return Err(invalid("ttl_secs", &format!("must be at most {MAX_TTL_SECS}")));
        }
        if self.repair_window_days == 0 {
            return Err(invalid("repair_window_days", "must be greater than zero"));
        }
        for (field, days) in [
            ("repair_window_days", self.repair_window_days),
            ("machine_addition_window_days", self.machine_addition_window_days),
        ] {
            if days > MAX_WINDOW_DAYS {
                return Err(invalid(field, &format!("must be at most {MAX_WINDOW_DAYS} days")));
            }
        }
        if self.repair_scan_limit == 0 {
            return Err(invalid("repair_scan_limit", "must be greater than zero"));
        }
        if self.today_scan_limit == 0 {
            return Err(invalid("today_scan_limit", "must be greater than zero"));
        }
        if let Some(rule) = self
            .buckets
            .iter()
            .find(|r| r.make_contains.trim().is_empty() || r.bucket.trim().is_empty())
        {
            return Err(invalid(
                "buckets",
                &format!("rule {rule:?} has an empty pattern or bucket"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = StatsConfig::default();
        assert_eq!(config.ttl_secs, 300);
        assert_eq!(config.repair_window_days, 90);
        assert_eq!(config.machine_addition_window_days, 30);
        assert!(!config.serve_stale_on_error);
        assert!(!config.buckets.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn zero_ttl_rejected() {
        let config = StatsConfig {
            ttl_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stats.ttl_secs"));
    }

    #[test]
    fn empty_bucket_rule_rejected() {
        let config = StatsConfig {
            buckets: vec![BucketRule::new(" ", "Forklift")],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "stats.buckets"
        ));
    }

    #[rstest::rstest]
    #[case::ttl(StatsConfig { ttl_secs: u64::MAX, ..Default::default() }, "stats.ttl_secs")]
    #[case::repair_window(
        StatsConfig { repair_window_days: u32::MAX, ..Default::default() },
        "stats.repair_window_days"
    )]
    #[case::addition_window(
        StatsConfig { machine_addition_window_days: MAX_WINDOW_DAYS + 1, ..Default::default() },
        "stats.machine_addition_window_days"
    )]
    fn out_of_range_values_rejected(#[case] config: StatsConfig, #[case] expected: &str) {
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == expected
        ));
    }

    #[test]
    fn upper_bounds_are_inclusive() {
        let config = StatsConfig {
            ttl_secs: MAX_TTL_SECS,
            repair_window_days: MAX_WINDOW_DAYS,
            machine_addition_window_days: MAX_WINDOW_DAYS,
            ..Default::default()
        };
        config.validate().unwrap();
    }
}
