//! # eco-07-community
//!
//! Community Reports subsystem for EcoCash.
//!
//! Residents report environmental incidents; other users add supporting
//! evidence (one support per account, identity equality is the only check)
//! and attach witness sightings. Reports and sightings live in their own
//! collections and never touch the ledger.

pub mod service;

pub use service::{CommunityReportsEngine, NewReport};
