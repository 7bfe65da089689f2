//! # Local Mirror Adapter
//!
//! Keeps full collection snapshots in memory, persists each collection as a
//! single JSON array file, and publishes a change event after every
//! mutation.
//!
//! ## Persisted Layout
//!
//! ```text
//! <data_dir>/users.json        # full snapshot array
//! <data_dir>/offers.json
//! <data_dir>/...
//! <data_dir>/generation        # store-wide write counter
//! ```
//!
//! Every mutation rewrites the entire collection file and bumps the
//! generation counter. Other processes sharing the directory observe the
//! counter move, re-read the changed collections, and republish the
//! mutations to their own subscribers (`ChangeOrigin::CrossProcess`).
//! Within one process events are delivered in applied order; across
//! processes ordering is best-effort.

use crate::domain::document::{doc_id, doc_rev, require_valid_document, shallow_merge};
use crate::ports::gateway::{DocumentGateway, Watch};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use shared_bus::{ChangeEvent, ChangeFilter, ChangeOrigin, ChangePublisher, InMemoryChangeBus, Subscription};
use shared_types::{Collection, EcoError, EcoResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Name of the store-wide write counter file.
const GENERATION_FILE: &str = "generation";

/// Local mirrored store: one persisted snapshot list per collection.
pub struct LocalMirrorStore {
    data_dir: PathBuf,
    state: RwLock<HashMap<Collection, Vec<Value>>>,
    bus: Arc<InMemoryChangeBus>,
    /// Last generation this process wrote or observed.
    last_seen_generation: AtomicU64,
}

impl LocalMirrorStore {
    /// Open (or initialize) a mirror rooted at `data_dir`.
    pub fn open(data_dir: impl Into<PathBuf>, bus: Arc<InMemoryChangeBus>) -> EcoResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .map_err(|e| EcoError::BackendUnavailable(format!("mirror dir: {e}")))?;

        let mut state = HashMap::new();
        for collection in Collection::ALL {
            state.insert(collection, load_collection(&data_dir, collection)?);
        }

        let generation = read_generation(&data_dir);
        info!(dir = %data_dir.display(), generation, "Local mirror opened");

        Ok(Self {
            data_dir,
            state: RwLock::new(state),
            bus,
            last_seen_generation: AtomicU64::new(generation),
        })
    }

    /// The change bus this store publishes on.
    #[must_use]
    pub fn bus(&self) -> Arc<InMemoryChangeBus> {
        self.bus.clone()
    }

    /// Re-read the shared store and republish mutations applied by other
    /// processes. Returns the number of entities that changed.
    ///
    /// Best-effort: a torn read of a collection file is skipped and retried
    /// on the next poll.
    pub fn sync_from_disk(&self) -> EcoResult<usize> {
        let disk_generation = read_generation(&self.data_dir);
        if disk_generation <= self.last_seen_generation.load(Ordering::Acquire) {
            return Ok(0);
        }

        let mut changed = Vec::new();
        {
            let mut state = self.state.write();
            for collection in Collection::ALL {
                let fresh = match load_collection(&self.data_dir, collection) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(%collection, error = %e, "Skipping torn collection read");
                        continue;
                    }
                };
                let stale = state.get(&collection).cloned().unwrap_or_default();
                for doc in &fresh {
                    let Some(id) = doc_id(doc) else { continue };
                    let old_rev = stale
                        .iter()
                        .find(|d| doc_id(d) == Some(id))
                        .map(doc_rev);
                    if old_rev != Some(doc_rev(doc)) {
                        changed.push(ChangeEvent {
                            collection,
                            entity_id: id.to_string(),
                            snapshot: Some(doc.clone()),
                            rev: doc_rev(doc),
                            origin: ChangeOrigin::CrossProcess,
                        });
                    }
                }
                state.insert(collection, fresh);
            }
        }

        self.last_seen_generation
            .store(disk_generation, Ordering::Release);

        let count = changed.len();
        for event in changed {
            self.bus.publish(event);
        }
        if count > 0 {
            debug!(count, generation = disk_generation, "Cross-process changes republished");
        }
        Ok(count)
    }

    /// Spawn a background task that polls the shared store for cross-process
    /// mutations.
    pub fn spawn_sync_task(store: Arc<Self>, poll_interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if let Err(e) = store.sync_from_disk() {
                    warn!(error = %e, "Mirror sync failed");
                }
            }
        })
    }

    /// Persist one collection and bump the store-wide generation.
    fn persist(&self, collection: Collection, entries: &[Value]) -> EcoResult<()> {
        write_collection(&self.data_dir, collection, entries)?;

        let disk = read_generation(&self.data_dir);
        let next = disk.max(self.last_seen_generation.load(Ordering::Acquire)) + 1;
        write_generation(&self.data_dir, next)?;
        self.last_seen_generation.store(next, Ordering::Release);
        Ok(())
    }

    fn publish_local(&self, collection: Collection, id: &str, snapshot: &Value) {
        self.bus.publish(ChangeEvent {
            collection,
            entity_id: id.to_string(),
            snapshot: Some(snapshot.clone()),
            rev: doc_rev(snapshot),
            origin: ChangeOrigin::Local,
        });
    }
}

#[async_trait]
impl DocumentGateway for LocalMirrorStore {
    async fn create(&self, collection: Collection, mut document: Value) -> EcoResult<Value> {
        // Keep the suspension points of the networked backend.
        tokio::task::yield_now().await;

        let id = require_valid_document(collection, &document)?;
        if let Some(map) = document.as_object_mut() {
            map.insert("rev".into(), Value::from(1u64));
        }

        {
            let mut state = self.state.write();
            let entries = state.entry(collection).or_default();
            if entries.iter().any(|d| doc_id(d) == Some(id.as_str())) {
                return Err(EcoError::ValidationError(format!(
                    "duplicate id {id} in {collection}"
                )));
            }
            entries.push(document.clone());
            self.persist(collection, entries)?;
        }

        self.publish_local(collection, &id, &document);
        Ok(document)
    }

    async fn get(&self, collection: Collection, id: &str) -> EcoResult<Option<Value>> {
        tokio::task::yield_now().await;

        let state = self.state.read();
        Ok(state
            .get(&collection)
            .and_then(|entries| entries.iter().find(|d| doc_id(d) == Some(id)))
            .cloned())
    }

    async fn list(&self, collection: Collection) -> EcoResult<Vec<Value>> {
        tokio::task::yield_now().await;

        let state = self.state.read();
        Ok(state.get(&collection).cloned().unwrap_or_default())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Value,
        expected_rev: Option<u64>,
    ) -> EcoResult<Value> {
        tokio::task::yield_now().await;

        let updated = {
            let mut state = self.state.write();
            let entries = state.entry(collection).or_default();
            let doc = entries
                .iter_mut()
                .find(|d| doc_id(d) == Some(id))
                .ok_or_else(|| EcoError::EntityNotFound {
                    collection,
                    id: id.to_string(),
                })?;

            let found = doc_rev(doc);
            if let Some(expected) = expected_rev {
                if expected != found {
                    return Err(EcoError::VersionConflict {
                        collection,
                        id: id.to_string(),
                        expected,
                        found,
                    });
                }
            }

            shallow_merge(doc, &patch);
            if let Some(map) = doc.as_object_mut() {
                map.insert("rev".into(), Value::from(found + 1));
            }
            let updated = doc.clone();
            self.persist(collection, entries)?;
            updated
        };

        self.publish_local(collection, id, &updated);
        Ok(updated)
    }

    async fn watch(&self, collection: Collection, id: &str) -> EcoResult<Watch> {
        tokio::task::yield_now().await;

        // Subscribe before snapshotting so no mutation lands in the gap.
        let changes = self.bus.subscribe(ChangeFilter::entity(collection, id));
        let initial = self.get(collection, id).await?;
        Ok(Watch { initial, changes })
    }

    fn watch_collection(&self, collection: Collection) -> Subscription {
        self.bus.subscribe(ChangeFilter::collection(collection))
    }
}

// =============================================================================
// SNAPSHOT FILES
// =============================================================================

fn collection_path(dir: &Path, collection: Collection) -> PathBuf {
    dir.join(format!("{collection}.json"))
}

fn load_collection(dir: &Path, collection: Collection) -> EcoResult<Vec<Value>> {
    let path = collection_path(dir, collection);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = fs::read(&path)
        .map_err(|e| EcoError::BackendUnavailable(format!("read {collection}: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| EcoError::SerializationError(format!("decode {collection}: {e}")))
}

/// Rewrite the full snapshot atomically: temp file, then rename.
fn write_collection(dir: &Path, collection: Collection, entries: &[Value]) -> EcoResult<()> {
    let path = collection_path(dir, collection);
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(entries)
        .map_err(|e| EcoError::SerializationError(format!("encode {collection}: {e}")))?;
    fs::write(&tmp, bytes)
        .map_err(|e| EcoError::BackendUnavailable(format!("write {collection}: {e}")))?;
    fs::rename(&tmp, &path)
        .map_err(|e| EcoError::BackendUnavailable(format!("rename {collection}: {e}")))?;
    Ok(())
}

fn read_generation(dir: &Path) -> u64 {
    fs::read_to_string(dir.join(GENERATION_FILE))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn write_generation(dir: &Path, generation: u64) -> EcoResult<()> {
    fs::write(dir.join(GENERATION_FILE), generation.to_string())
        .map_err(|e| EcoError::BackendUnavailable(format!("write generation: {e}")))
}
