//! # Id Minting
//!
//! Entity ids carry a human-facing prefix (`ECO-` for material declarations,
//! `SRV-` for services, and so on) followed by an uppercase segment of a
//! freshly generated UUID. The original platform minted ids from timestamps
//! and small random ranges; ids here are collision-resistant while keeping
//! the short printable shape the drop-off points type in by hand.

use std::fmt;
use uuid::Uuid;

/// Length of the random segment after the prefix.
const SEGMENT_LEN: usize = 8;

/// Kinds of entity ids, one per prefixed family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityId {
    /// Material declaration: `ECO-XXXXXXXX`.
    Declaration,
    /// On-demand service: `SRV-XXXXXXXX`.
    Service,
    /// Generic offer record: `OFF-XXXXXXXX`.
    Offer,
    /// Community report: `REP-XXXXXXXX`.
    Report,
    /// Witness sighting: `WIT-XXXXXXXX`.
    Sighting,
    /// Cause: `CAU-XXXXXXXX`.
    Cause,
    /// User account: `USR-XXXXXXXX`.
    User,
}

impl EntityId {
    /// The prefix for this id family.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            EntityId::Declaration => "ECO",
            EntityId::Service => "SRV",
            EntityId::Offer => "OFF",
            EntityId::Report => "REP",
            EntityId::Sighting => "WIT",
            EntityId::Cause => "CAU",
            EntityId::User => "USR",
        }
    }

    /// Mint a new globally-unique id for this family.
    #[must_use]
    pub fn mint(self) -> String {
        let raw = Uuid::new_v4().simple().to_string().to_uppercase();
        format!("{}-{}", self.prefix(), &raw[..SEGMENT_LEN])
    }

    /// Check whether `id` belongs to this family.
    #[must_use]
    pub fn owns(self, id: &str) -> bool {
        id.strip_prefix(self.prefix())
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|seg| !seg.is_empty())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A timestamp in milliseconds since the UNIX epoch.
///
/// Stored on documents for display ordering only; never used for id minting.
pub type TimestampMillis = u64;
