//! # eco-05-energy
//!
//! Energy Credit subsystem for EcoCash.
//!
//! ## Role in System
//!
//! - **Injection**: converts producer-injected kilowatt-hours into wallet
//!   balance at the producer's region price, and accumulates sellable
//!   credits
//! - **Settlement**: converts a consumer's bill payment into a two-leg
//!   settlement (platform-fee leg + producer-payout leg) with an explicit
//!   percentage split; each leg's completion is persisted on the bill
//!   itself, so the settlement state survives a client restart
//!
//! Settlement confirmations toward the payment rail are simulated; the
//! engine's job is the consumer debit and the bill state machine.

pub mod domain;
pub mod service;

pub use domain::{
    settlement_breakdown, EnergyConfig, SettlementReceipt, PLATFORM_FEE_RATE, PRODUCER_PRICE,
};
pub use service::EnergyCreditEngine;
