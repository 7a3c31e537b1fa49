//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
const fn default_limit() -> u32 {
    50
}

/// Hard ceiling on any list request.
const fn default_max_limit() -> u32 {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default result limit for list endpoints.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Largest `limit` a caller may request.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl GeneralConfig {
    /// Resolve a caller-supplied limit against the defaults.
    #[must_use]
    pub fn clamp_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_limit, 50);
        assert_eq!(config.max_limit, 500);
    }

    #[test]
    fn clamp_limit_bounds_requests() {
        let config = GeneralConfig::default();
        assert_eq!(config.clamp_limit(None), 50);
        assert_eq!(config.clamp_limit(Some(0)), 1);
        assert_eq!(config.clamp_limit(Some(10_000)), 500);
        assert_eq!(config.clamp_limit(Some(25)), 25);
    }
}
