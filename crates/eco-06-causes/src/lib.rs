//! # eco-06-causes
//!
//! Causes Voting subsystem for EcoCash.
//!
//! Users vote scarce reputation points into environmental causes. A vote is
//! an atomic point deduction from the voter followed by a jackpot credit on
//! the cause; the pair is journaled through the ledger so a credit that
//! never lands is detectable. A cause's jackpot never decreases.
//!
//! Points are earned through platform activity (ad rewards) or bought at a
//! fixed rate, both through the ledger.

pub mod service;

pub use service::{CausesVotingEngine, POINTS_PER_CURRENCY};
