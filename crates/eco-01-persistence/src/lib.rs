//! # eco-01-persistence
//!
//! Persistence Gateway subsystem for EcoCash.
//!
//! ## Role in System
//!
//! - **Uniform CRUD + point-query + subscribe** over the named collections
//!   (`users`, `offers`, `services`, `causes`, `reports`, `sightings`)
//! - **Two interchangeable backends**: a networked document-store adapter and
//!   a local mirrored-store adapter that persists each collection as a full
//!   snapshot list and notifies local and cross-process subscribers after
//!   every mutation
//! - **Backend selection happens once, at process start**, from a capability
//!   check (valid remote credentials present, no force-local override). The
//!   chosen store is an explicitly constructed object injected into every
//!   engine; there is no process-wide backend flag.
//!
//! ## Concurrency Shape
//!
//! Every gateway call is a suspension point. The local mirror resolves
//! synchronously but yields at the same points, so engine code has the same
//! control-flow shape against either backend. Writes are guarded by a
//! per-document revision: an `update` carrying a stale revision is rejected
//! with `VersionConflict` instead of silently overwriting.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod repository;
pub mod select;

pub use adapters::{LocalMirrorStore, RemoteStore, RemoteStoreConfig};
pub use domain::document::{doc_id, doc_rev, shallow_merge};
pub use ports::{DocumentGateway, Watch};
pub use repository::Repository;
pub use select::{choose_backend, BackendChoice, RemoteCredentials};
