//! # Gateway Port
//!
//! The uniform interface every engine writes through. Implemented by the
//! networked document-store adapter and the local mirrored-store adapter.

use async_trait::async_trait;
use serde_json::Value;
use shared_bus::Subscription;
use shared_types::{Collection, EcoResult};

/// A point subscription: the snapshot at subscription time plus the stream
/// of subsequent mutations to the same id.
///
/// This is the "immediately invoke with the current snapshot, then again
/// after every mutation" contract expressed as data: the caller consumes
/// `initial` first, then drains `changes`.
pub struct Watch {
    /// Snapshot at subscription time; `None` when the id is absent.
    pub initial: Option<Value>,
    /// Stream of subsequent mutations to the watched id.
    pub changes: Subscription,
}

/// Uniform CRUD + point-query + subscribe over named collections.
///
/// ## Contract
///
/// - `create` inserts a new document (object with a non-empty `id`).
/// - `get` returns the current snapshot or `None`.
/// - `list` returns the full collection snapshot.
/// - `update` shallow-merges `patch` over the stored snapshot and bumps the
///   revision. Fails `EntityNotFound` when the id is absent. When
///   `expected_rev` is given and does not match the stored revision, fails
///   `VersionConflict` with no mutation; `None` preserves the legacy
///   last-write-wins merge.
/// - `watch` delivers the current snapshot immediately, then one event per
///   subsequent mutation of that id, including mutations by other local
///   subscribers and, on the local-mirror backend, mutations observed from
///   other processes sharing the store (best-effort ordering across
///   processes, applied order within one process).
///
/// No operation retries automatically; transient faults surface as
/// `BackendUnavailable` and the caller decides.
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    /// Insert a new document into a collection.
    async fn create(&self, collection: Collection, document: Value) -> EcoResult<Value>;

    /// Fetch one document by id.
    async fn get(&self, collection: Collection, id: &str) -> EcoResult<Option<Value>>;

    /// Fetch the full collection snapshot.
    async fn list(&self, collection: Collection) -> EcoResult<Vec<Value>>;

    /// Shallow-merge `patch` over the stored document.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Value,
        expected_rev: Option<u64>,
    ) -> EcoResult<Value>;

    /// Subscribe to one entity: current snapshot plus subsequent mutations.
    async fn watch(&self, collection: Collection, id: &str) -> EcoResult<Watch>;

    /// Subscribe to every mutation in a collection (list views).
    fn watch_collection(&self, collection: Collection) -> Subscription;
}
