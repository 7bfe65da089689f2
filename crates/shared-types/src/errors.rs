//! # Error Taxonomy
//!
//! Defines the error types used across subsystems.
//!
//! Business refusals (insufficient funds/points, illegal transition,
//! already-settled) are returned as typed `Err` values and leave state
//! unchanged. `BackendUnavailable` marks a transient fault with no
//! partial-state guarantee across multi-write operations; the caller decides
//! whether to retry; nothing in the core retries automatically.

use crate::collections::Collection;
use thiserror::Error;

/// Convenience alias used by every subsystem.
pub type EcoResult<T> = Result<T, EcoError>;

/// Errors that can occur in the EcoCash core.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EcoError {
    /// Monetary balance below the required amount. No mutation occurred.
    #[error("Insufficient funds: required {required:.2}, available {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    /// Point balance below the required amount. No mutation occurred.
    #[error("Insufficient points: required {required}, available {available}")]
    InsufficientPoints { required: u64, available: u64 },

    /// Entity not found in the given collection.
    #[error("Entity not found: {collection}/{id}")]
    EntityNotFound { collection: Collection, id: String },

    /// Operation attempted outside its legal source state.
    #[error("Invalid transition for {id}: {operation} not allowed from {from}")]
    InvalidTransition {
        id: String,
        operation: &'static str,
        from: String,
    },

    /// The entity was already settled; settling twice would double-pay.
    #[error("Already settled: {0}")]
    AlreadySettled(String),

    /// The write was based on a stale revision of the document.
    #[error("Version conflict on {collection}/{id}: expected rev {expected}, found {found}")]
    VersionConflict {
        collection: Collection,
        id: String,
        expected: u64,
        found: u64,
    },

    /// Networked store unreachable or faulted mid-operation.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Non-numeric, non-positive, or non-finite amount where one is required.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Stored document could not be decoded into the expected entity shape.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl EcoError {
    /// Whether this error is a business-rule refusal (prompt the user for
    /// correction) as opposed to a transient fault (candidate for retry).
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        !matches!(self, EcoError::BackendUnavailable(_))
    }
}
