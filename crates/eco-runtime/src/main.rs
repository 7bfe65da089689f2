//! EcoCash platform binary.
//!
//! Boots telemetry, runs the backend capability check, wires the engines,
//! seeds demo data on an empty store, and serves until interrupted. The
//! presentation layer talks to the engines through the container; this
//! binary owns only bootstrapping.

use anyhow::Context;
use eco_runtime::seed::seed_demo_data;
use eco_runtime::{telemetry, Platform, PlatformConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("info");

    let config = PlatformConfig::from_env();
    let mut platform = Platform::build(&config).context("failed to build platform")?;
    info!(backend = ?platform.backend, "EcoCash platform up");

    if config.seed_demo_data {
        let seeded = seed_demo_data(&platform)
            .await
            .context("failed to seed demo data")?;
        if seeded {
            info!("Store was empty; demo data loaded");
        }
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");
    platform.shutdown();
    Ok(())
}
