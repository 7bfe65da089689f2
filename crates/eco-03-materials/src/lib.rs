//! # eco-03-materials
//!
//! Material Lifecycle subsystem for EcoCash.
//!
//! ## Role in System
//!
//! State machine for a recyclable-material declaration, from a resident's
//! creation through collector pickup to point-of-sale liquidation:
//!
//! ```text
//! [Pending] ──accept──→ [CollectorAssigned] ──confirm_weight──→ [Collected]
//!     │                                                             │
//!     └──(approval)──→ [Approved] ──accept──┘     liquidate ──→ [Completed]
//! ```
//!
//! Liquidation pays a fixed 70/30 resident/collector split, both legs
//! fronted by the point-of-sale account through the ledger.

pub mod domain;
pub mod service;

pub use domain::{liquidation_shares, rescale_value, COLLECTOR_SHARE, RESIDENT_SHARE};
pub use service::{MaterialLifecycleEngine, NewDeclaration};
