//! # eco-02-ledger
//!
//! Ledger subsystem for EcoCash.
//!
//! ## Role in System
//!
//! - **Sole Mutator**: balances and points on a user account are only ever
//!   written through the operations in this crate
//! - **Single-Account Writes**: no multi-document transaction primitive is
//!   assumed; a multi-account operation is a sequence of single-account
//!   writes, each guarded by the document revision it read
//! - **Compensating-Action Log**: both legs of a transfer are journaled, so
//!   a failure between the debit and the credit is detectable and
//!   reconcilable instead of silently losing money
//!
//! Guarded operations (`spend_balance`, `spend_points`) refuse with a typed
//! error and mutate nothing when the precondition fails. Nothing in this
//! crate retries automatically.

pub mod journal;
pub mod service;

pub use journal::{LegKind, TransferEntry, TransferJournal, TransferState};
pub use service::LedgerService;
