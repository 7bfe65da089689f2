//! Adapters of the persistence subsystem.
//!
//! - `local_mirror`: full-snapshot JSON store on the local filesystem with
//!   change notification to local and cross-process subscribers
//! - `remote`: networked document-store client

pub mod local_mirror;
pub mod remote;

pub use local_mirror::LocalMirrorStore;
pub use remote::{RemoteStore, RemoteStoreConfig};
