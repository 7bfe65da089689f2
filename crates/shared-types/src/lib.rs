//! # Shared Types Crate
//!
//! This crate contains all domain entities, status enums, the error
//! taxonomy, and id minting shared across EcoCash subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Guarded Mutation**: `balance` and `points` on a [`UserAccount`] are
//!   only ever written through the ledger subsystem; entities here are plain
//!   data.
//! - **Typed Failures**: Business refusals and transient faults are distinct
//!   variants of [`EcoError`] so callers can decide between prompting for
//!   correction and retrying.

pub mod collections;
pub mod entities;
pub mod errors;
pub mod ids;

pub use collections::Collection;
pub use entities::*;
pub use errors::{EcoError, EcoResult};
pub use ids::{EntityId, TimestampMillis};
