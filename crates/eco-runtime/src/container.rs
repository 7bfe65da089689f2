//! # Platform Container
//!
//! Builds the store once (capability check) and injects it, by reference,
//! into every engine. Engines never consult a global: the repository object
//! they receive at construction is the only store they ever see.

use crate::config::PlatformConfig;
use eco_01_persistence::{
    choose_backend, BackendChoice, DocumentGateway, LocalMirrorStore, RemoteStore,
    RemoteStoreConfig,
};
use eco_02_ledger::LedgerService;
use eco_03_materials::MaterialLifecycleEngine;
use eco_04_services::ServiceNegotiationEngine;
use eco_05_energy::EnergyCreditEngine;
use eco_06_causes::CausesVotingEngine;
use eco_07_community::CommunityReportsEngine;
use eco_08_collaborators::{FallbackEstimator, GuardedEstimator};
use shared_bus::InMemoryChangeBus;
use shared_types::EcoResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// The wired platform: one store, one ledger, every engine.
pub struct Platform {
    /// Change bus shared by the store and all subscribers.
    pub bus: Arc<InMemoryChangeBus>,
    /// The store selected at startup.
    pub gateway: Arc<dyn DocumentGateway>,
    /// Ledger over the store.
    pub ledger: Arc<LedgerService>,
    /// Material lifecycle engine.
    pub materials: Arc<MaterialLifecycleEngine>,
    /// Service negotiation engine.
    pub services: Arc<ServiceNegotiationEngine>,
    /// Energy credit engine.
    pub energy: Arc<EnergyCreditEngine>,
    /// Causes voting engine.
    pub causes: Arc<CausesVotingEngine>,
    /// Community reports engine.
    pub community: Arc<CommunityReportsEngine>,
    /// Weight/price estimator for the declaration flow. Serves the
    /// deterministic fallback until a generative collaborator is plugged in.
    pub estimator: Arc<GuardedEstimator<FallbackEstimator>>,
    /// Which backend the capability check picked.
    pub backend: BackendChoice,
    mirror_sync: Option<JoinHandle<()>>,
}

impl Platform {
    /// Run the capability check, construct the selected store, and wire
    /// every engine. Must run inside a tokio runtime (the local mirror
    /// spawns its cross-process sync task).
    pub fn build(config: &PlatformConfig) -> EcoResult<Self> {
        let bus = Arc::new(InMemoryChangeBus::new());
        let backend = choose_backend(config.store.remote.as_ref(), config.store.force_local);

        let (gateway, mirror_sync): (Arc<dyn DocumentGateway>, Option<JoinHandle<()>>) =
            match backend {
                BackendChoice::Remote => {
                    let creds = config
                        .store
                        .remote
                        .as_ref()
                        .expect("capability check selected Remote without credentials");
                    info!(base_url = %creds.base_url, "Using networked document store");
                    let store = RemoteStore::new(
                        RemoteStoreConfig {
                            base_url: creds.base_url.clone(),
                            api_key: creds.api_key.clone(),
                            request_timeout: Duration::from_secs(10),
                        },
                        bus.clone(),
                    )?;
                    (Arc::new(store), None)
                }
                BackendChoice::LocalMirror => {
                    info!(dir = %config.store.data_dir.display(), "Using local mirrored store");
                    let store =
                        Arc::new(LocalMirrorStore::open(&config.store.data_dir, bus.clone())?);
                    let sync = LocalMirrorStore::spawn_sync_task(
                        store.clone(),
                        config.store.mirror_poll_interval,
                    );
                    (store, Some(sync))
                }
            };

        let ledger = Arc::new(LedgerService::new(gateway.clone()));
        let materials = Arc::new(MaterialLifecycleEngine::new(gateway.clone(), ledger.clone()));
        let services = Arc::new(ServiceNegotiationEngine::new(gateway.clone(), ledger.clone()));
        let energy = Arc::new(EnergyCreditEngine::new(
            gateway.clone(),
            ledger.clone(),
            config.energy.clone(),
        ));
        let causes = Arc::new(CausesVotingEngine::new(gateway.clone(), ledger.clone()));
        let community = Arc::new(CommunityReportsEngine::new(gateway.clone()));
        let estimator = Arc::new(GuardedEstimator::new(
            FallbackEstimator,
            Duration::from_secs(8),
        ));

        Ok(Self {
            bus,
            gateway,
            ledger,
            materials,
            services,
            energy,
            causes,
            community,
            estimator,
            backend,
            mirror_sync,
        })
    }

    /// Stop background work. Engine handles stay usable for in-flight calls.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.mirror_sync.take() {
            task.abort();
        }
        info!("Platform shut down");
    }
}

impl Drop for Platform {
    fn drop(&mut self) {
        if let Some(task) = self.mirror_sync.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_01_persistence::RemoteCredentials;

    #[tokio::test]
    async fn test_build_defaults_to_local_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PlatformConfig::default();
        config.store.data_dir = dir.path().to_path_buf();

        let platform = Platform::build(&config).unwrap();
        assert_eq!(platform.backend, BackendChoice::LocalMirror);
    }

    #[tokio::test]
    async fn test_build_selects_remote_with_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PlatformConfig::default();
        config.store.data_dir = dir.path().to_path_buf();
        config.store.remote = Some(RemoteCredentials {
            base_url: "https://store.ecocash.example".into(),
            api_key: "k-3f9a8e7d6c5b".into(),
        });

        let platform = Platform::build(&config).unwrap();
        assert_eq!(platform.backend, BackendChoice::Remote);
    }

    #[tokio::test]
    async fn test_force_local_wins_over_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PlatformConfig::default();
        config.store.data_dir = dir.path().to_path_buf();
        config.store.remote = Some(RemoteCredentials {
            base_url: "https://store.ecocash.example".into(),
            api_key: "k-3f9a8e7d6c5b".into(),
        });
        config.store.force_local = true;

        let platform = Platform::build(&config).unwrap();
        assert_eq!(platform.backend, BackendChoice::LocalMirror);
    }
}
