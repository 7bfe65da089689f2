//! # Backend Selection
//!
//! The backend is chosen once, at process start, from a capability check:
//! the networked store is used when usable remote credentials are present
//! and no explicit force-local override is set; otherwise the local mirror.
//! The choice does not change at runtime: the runtime container constructs
//! the selected store and injects it by reference into every engine.

/// Keys shorter than this cannot be real store credentials.
const MIN_API_KEY_LEN: usize = 10;

/// Scaffolding keys shipped in sample configs.
const PLACEHOLDER_PREFIX: &str = "PLACEHOLDER";

/// Credentials for the networked document store.
#[derive(Debug, Clone)]
pub struct RemoteCredentials {
    /// Base URL of the store.
    pub base_url: String,
    /// API key for the store.
    pub api_key: String,
}

impl RemoteCredentials {
    /// Whether these credentials can plausibly reach a real store.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.base_url.is_empty()
            && self.api_key.len() > MIN_API_KEY_LEN
            && !self.api_key.starts_with(PLACEHOLDER_PREFIX)
    }
}

/// Which backend the capability check selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    /// Networked document store.
    Remote,
    /// Local mirrored store.
    LocalMirror,
}

/// Run the capability check.
#[must_use]
pub fn choose_backend(credentials: Option<&RemoteCredentials>, force_local: bool) -> BackendChoice {
    match credentials {
        Some(creds) if creds.is_usable() && !force_local => BackendChoice::Remote,
        _ => BackendChoice::LocalMirror,
    }
}
