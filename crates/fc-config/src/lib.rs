//! # fc-config
//!
//! Layered configuration loading for fleetcheck using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FLEETCHECK_*` prefix, `__` as separator)
//! 2. Project-level `.fleetcheck/config.toml`
//! 3. User-level `~/.config/fleetcheck/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `FLEETCHECK_DATABASE__PATH` -> `database.path`,
//! `FLEETCHECK_STATS__TTL_SECS` -> `stats.ttl_secs`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use fc_config::FleetConfig;
//!
//! let config = FleetConfig::load_with_dotenv(std::path::Path::new(".")).expect("config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

mod database;
mod error;
mod general;
mod server;
mod stats;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use server::ServerConfig;
pub use stats::{BucketRule, MAX_TTL_SECS, MAX_WINDOW_DAYS, StatsConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FleetConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl FleetConfig {
    /// Load from every layer, with the working directory as the project root.
    ///
    /// Does not read `.env`; see [`Self::load_with_dotenv`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_in(Path::new("."))
    }

    /// Load `{project_dir}/.env` into the process environment, then every layer.
    ///
    /// A missing `.env` is skipped. Variables already set in the environment
    /// are not overwritten by `.env` entries.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Dotenv` if `.env` exists but cannot be read or
    /// parsed, otherwise as [`Self::load_in`].
    pub fn load_with_dotenv(project_dir: &Path) -> Result<Self, ConfigError> {
        match dotenvy::from_path(project_dir.join(".env")) {
            Err(e) if !e.not_found() => return Err(ConfigError::Dotenv(e)),
            _ => {}
        }
        Self::load_in(project_dir)
    }

    /// Load with `{project_dir}/.fleetcheck/config.toml` as the project layer.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_in(project_dir: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment_in(project_dir))
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.stats.validate()?;
        Ok(config)
    }

    /// Provider chain rooted at the working directory.
    pub fn figment() -> Figment {
        Self::figment_in(Path::new("."))
    }

    /// Defaults, then the user file, then the project file, then `FLEETCHECK_*`.
    ///
    /// Missing files are skipped.
    pub fn figment_in(project_dir: &Path) -> Figment {
        let user = dirs::config_dir().map(|dir| dir.join("fleetcheck").join("config.toml"));
        let project = project_dir.join(".fleetcheck").join("config.toml");

        user.into_iter()
            .chain([project])
            .filter(|path| path.exists())
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
            .merge(Env::prefixed("FLEETCHECK_").split("__"))
    }
}
