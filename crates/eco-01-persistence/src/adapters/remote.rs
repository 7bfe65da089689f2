//! # Remote Store Adapter
//!
//! Document-store client for the networked backend. Speaks a small JSON
//! protocol:
//!
//! ```text
//! POST   /v1/{collection}                  create
//! GET    /v1/{collection}/{id}             point query
//! GET    /v1/{collection}                  full snapshot
//! PATCH  /v1/{collection}/{id}?rev={n}     shallow-merge update
//! ```
//!
//! Transport faults and non-success responses surface as
//! `BackendUnavailable`; a 404 on a point operation is `EntityNotFound`
//! (`None` for `get`), a 409 is `VersionConflict`. After every successful
//! mutation the adapter notifies local subscribers through the change bus;
//! server-push fan-out to other clients is the store's concern, not this
//! adapter's.

use crate::domain::document::{doc_rev, require_valid_document};
use crate::ports::gateway::{DocumentGateway, Watch};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use shared_bus::{ChangeEvent, ChangeFilter, ChangeOrigin, ChangePublisher, InMemoryChangeBus, Subscription};
use shared_types::{Collection, EcoError, EcoResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for the networked document store.
#[derive(Debug, Clone)]
pub struct RemoteStoreConfig {
    /// Base URL of the store, e.g. `https://store.ecocash.example`.
    pub base_url: String,
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Networked document-store adapter.
pub struct RemoteStore {
    client: reqwest::Client,
    config: RemoteStoreConfig,
    bus: Arc<InMemoryChangeBus>,
}

impl RemoteStore {
    /// Build a client for the given store.
    pub fn new(config: RemoteStoreConfig, bus: Arc<InMemoryChangeBus>) -> EcoResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EcoError::BackendUnavailable(format!("client init: {e}")))?;
        Ok(Self { client, config, bus })
    }

    /// The change bus this store publishes on.
    #[must_use]
    pub fn bus(&self) -> Arc<InMemoryChangeBus> {
        self.bus.clone()
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/v1/{collection}", self.config.base_url.trim_end_matches('/'))
    }

    fn entity_url(&self, collection: Collection, id: &str) -> String {
        format!("{}/{id}", self.collection_url(collection))
    }

    async fn read_body(response: reqwest::Response) -> EcoResult<Value> {
        response
            .json()
            .await
            .map_err(|e| EcoError::SerializationError(format!("response body: {e}")))
    }

    /// Map a non-success point-operation response to the error taxonomy.
    async fn point_error(
        collection: Collection,
        id: &str,
        expected_rev: Option<u64>,
        response: reqwest::Response,
    ) -> EcoError {
        match response.status() {
            StatusCode::NOT_FOUND => EcoError::EntityNotFound {
                collection,
                id: id.to_string(),
            },
            StatusCode::CONFLICT => {
                let found = response
                    .json::<Value>()
                    .await
                    .ok()
                    .as_ref()
                    .map(doc_rev)
                    .unwrap_or(0);
                EcoError::VersionConflict {
                    collection,
                    id: id.to_string(),
                    expected: expected_rev.unwrap_or(0),
                    found,
                }
            }
            status => EcoError::BackendUnavailable(format!("{collection}/{id}: HTTP {status}")),
        }
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
impl DocumentGateway for RemoteStore {
    async fn create(&self, collection: Collection, document: Value) -> EcoResult<Value> {
        let id = require_valid_document(collection, &document)?;

        let response = self
            .client
            .post(self.collection_url(collection))
            .bearer_auth(&self.config.api_key)
            .json(&document)
            .send()
            .await
            .map_err(|e| EcoError::BackendUnavailable(format!("create {collection}: {e}")))?;

        if !response.status().is_success() {
            warn!(%collection, %id, status = %response.status(), "Create rejected by store");
            return Err(Self::point_error(collection, &id, None, response).await);
        }

        let stored = Self::read_body(response).await?;
        debug!(%collection, %id, "Document created");
        self.publish_local(collection, &id, &stored);
        Ok(stored)
    }

    async fn get(&self, collection: Collection, id: &str) -> EcoResult<Option<Value>> {
        let response = self
            .client
            .get(self.entity_url(collection, id))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| EcoError::BackendUnavailable(format!("get {collection}/{id}: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(Self::read_body(response).await?)),
            status => Err(EcoError::BackendUnavailable(format!(
                "get {collection}/{id}: HTTP {status}"
            ))),
        }
    }

    async fn list(&self, collection: Collection) -> EcoResult<Vec<Value>> {
        let response = self
            .client
            .get(self.collection_url(collection))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| EcoError::BackendUnavailable(format!("list {collection}: {e}")))?;

        if !response.status().is_success() {
            return Err(EcoError::BackendUnavailable(format!(
                "list {collection}: HTTP {}",
                response.status()
            )));
        }

        let body = Self::read_body(response).await?;
        match body {
            Value::Array(entries) => Ok(entries),
            other => Err(EcoError::SerializationError(format!(
                "list {collection}: expected array, got {other}"
            ))),
        }
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Value,
        expected_rev: Option<u64>,
    ) -> EcoResult<Value> {
        let mut request = self
            .client
            .patch(self.entity_url(collection, id))
            .bearer_auth(&self.config.api_key)
            .json(&patch);
        if let Some(rev) = expected_rev {
            request = request.query(&[("rev", rev)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EcoError::BackendUnavailable(format!("update {collection}/{id}: {e}")))?;

        if !response.status().is_success() {
            return Err(Self::point_error(collection, id, expected_rev, response).await);
        }

        let stored = Self::read_body(response).await?;
        debug!(%collection, %id, rev = doc_rev(&stored), "Document updated");
        self.publish_local(collection, id, &stored);
        Ok(stored)
    }

    async fn watch(&self, collection: Collection, id: &str) -> EcoResult<Watch> {
        // Subscribe before snapshotting so no local mutation lands in the gap.
        let changes = self.bus.subscribe(ChangeFilter::entity(collection, id));
        let initial = self.get(collection, id).await?;
        Ok(Watch { initial, changes })
    }

    fn watch_collection(&self, collection: Collection) -> Subscription {
        self.bus.subscribe(ChangeFilter::collection(collection))
    }
}
