//! # eco-04-services
//!
//! Service Negotiation subsystem for EcoCash.
//!
//! ## Role in System
//!
//! State machine for an on-demand service:
//!
//! ```text
//! [Open] ──bind──→ [Accepted] ──pay_escrow──→ [TaxPaid] ──schedule──→ [Scheduled]
//!                      │  ▲                                               │
//!            counter ──┘  └── counter        release_escrow ──→ [Completed]
//! ```
//!
//! Price and scope negotiate freely while `Accepted` (either side may
//! counter repeatedly, no turn-taking is enforced) until a party accepts
//! the counterpart's figure (`Agreed`). Escrow is a guarded debit of the
//! requester; release pays the provider net of a fixed 5% fee and is
//! guarded against double payment.

pub mod domain;
pub mod service;

pub use domain::{escrow_fee, ESCROW_FEE_RATE};
pub use service::{NewService, ServiceNegotiationEngine};
