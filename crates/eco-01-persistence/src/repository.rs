//! # Typed Repository
//!
//! Serde round-trip layer over the document gateway. Engines work with
//! entities; the repository handles encoding, decoding, and revision
//! bookkeeping.

use crate::ports::gateway::DocumentGateway;
use serde_json::Value;
use shared_bus::Subscription;
use shared_types::{EcoError, EcoResult, Persistable};
use std::marker::PhantomData;
use std::sync::Arc;

/// Typed access to one entity family in the store.
pub struct Repository<T> {
    gateway: Arc<dyn DocumentGateway>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Persistable> Repository<T> {
    /// Wrap a gateway for entity type `T`.
    #[must_use]
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        Self {
            gateway,
            _entity: PhantomData,
        }
    }

    /// The underlying gateway.
    #[must_use]
    pub fn gateway(&self) -> Arc<dyn DocumentGateway> {
        self.gateway.clone()
    }

    /// Insert a new entity; returns the stored copy with its revision set.
    pub async fn insert(&self, entity: &T) -> EcoResult<T> {
        let doc = encode(entity)?;
        let stored = self.gateway.create(T::COLLECTION, doc).await?;
        decode(stored)
    }

    /// Fetch one entity by id.
    pub async fn find(&self, id: &str) -> EcoResult<Option<T>> {
        match self.gateway.get(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    /// Fetch one entity by id, failing `EntityNotFound` when absent.
    pub async fn require(&self, id: &str) -> EcoResult<T> {
        self.find(id).await?.ok_or_else(|| EcoError::EntityNotFound {
            collection: T::COLLECTION,
            id: id.to_string(),
        })
    }

    /// Fetch the full collection.
    pub async fn all(&self) -> EcoResult<Vec<T>> {
        self.gateway
            .list(T::COLLECTION)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Shallow-merge a patch over the stored entity.
    ///
    /// `expected_rev` carries the revision the caller read; a stale value is
    /// rejected with `VersionConflict` and nothing is written.
    pub async fn patch(&self, id: &str, patch: Value, expected_rev: Option<u64>) -> EcoResult<T> {
        let stored = self
            .gateway
            .update(T::COLLECTION, id, patch, expected_rev)
            .await?;
        decode(stored)
    }

    /// Subscribe to one entity: current snapshot plus subsequent mutations.
    pub async fn watch(&self, id: &str) -> EcoResult<(Option<T>, Subscription)> {
        let watch = self.gateway.watch(T::COLLECTION, id).await?;
        let initial = match watch.initial {
            Some(doc) => Some(decode(doc)?),
            None => None,
        };
        Ok((initial, watch.changes))
    }

    /// Subscribe to every mutation in the collection (list views).
    #[must_use]
    pub fn watch_all(&self) -> Subscription {
        self.gateway.watch_collection(T::COLLECTION)
    }
}

fn encode<T: Persistable>(entity: &T) -> EcoResult<Value> {
    serde_json::to_value(entity).map_err(|e| EcoError::SerializationError(e.to_string()))
}

fn decode<T: Persistable>(doc: Value) -> EcoResult<T> {
    serde_json::from_value(doc).map_err(|e| EcoError::SerializationError(e.to_string()))
}
