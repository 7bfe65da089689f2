//! # EcoCash Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-subsystem flows
//!     ├── fixtures.rs   # Shared platform/account builders
//!     ├── flows.rs      # Declaration, negotiation, energy, voting end-to-end
//!     ├── properties.rs # Ledger conservation, guarded debits, idempotent release
//!     └── subscriptions.rs # Change-notification visibility across engines
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p eco-tests
//!
//! # By category
//! cargo test -p eco-tests integration::flows::
//! cargo test -p eco-tests integration::properties::
//! ```

pub mod integration;
