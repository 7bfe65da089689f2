//! # Platform Configuration
//!
//! Unified configuration for the runtime. Defaults are development-friendly
//! (local mirror under `./data`, no remote credentials); everything can be
//! overridden from `ECOCASH_*` environment variables.

use eco_01_persistence::RemoteCredentials;
use eco_05_energy::EnergyConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Complete platform configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Persistence backend configuration.
    pub store: StoreConfig,
    /// Region pricing for energy injection.
    pub energy: EnergyConfig,
    /// Seed demo accounts and entities on an empty store.
    pub seed_demo_data: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            energy: EnergyConfig::default(),
            seed_demo_data: true,
        }
    }
}

/// Persistence backend configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Remote document-store credentials, when configured.
    pub remote: Option<RemoteCredentials>,
    /// Force the local mirror even when credentials are present.
    pub force_local: bool,
    /// Data directory for the local mirror.
    pub data_dir: PathBuf,
    /// Poll interval for cross-process mirror synchronization.
    pub mirror_poll_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            remote: None,
            force_local: false,
            data_dir: PathBuf::from("./data"),
            mirror_poll_interval: Duration::from_millis(500),
        }
    }
}

impl PlatformConfig {
    /// Build the configuration from `ECOCASH_*` environment variables,
    /// starting from the defaults.
    ///
    /// - `ECOCASH_STORE_URL` / `ECOCASH_STORE_API_KEY` - remote credentials
    /// - `ECOCASH_FORCE_LOCAL=1` - force the local mirror
    /// - `ECOCASH_DATA_DIR` - mirror directory
    /// - `ECOCASH_NO_SEED=1` - skip demo seeding
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let (Ok(base_url), Ok(api_key)) = (
            std::env::var("ECOCASH_STORE_URL"),
            std::env::var("ECOCASH_STORE_API_KEY"),
        ) {
            config.store.remote = Some(RemoteCredentials { base_url, api_key });
        }
        if env_flag("ECOCASH_FORCE_LOCAL") {
            config.store.force_local = true;
        }
        if let Ok(dir) = std::env::var("ECOCASH_DATA_DIR") {
            config.store.data_dir = PathBuf::from(dir);
        }
        if env_flag("ECOCASH_NO_SEED") {
            config.seed_demo_data = false;
        }

        config
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}
