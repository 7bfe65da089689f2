//! # Named Collections
//!
//! The persistence gateway exposes a fixed set of named collections. Both
//! backends (networked document store, local mirror) persist exactly these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named collection in the document store.
///
/// The local-mirror backend persists one full snapshot array per collection;
/// the networked backend maps each to a remote collection path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// User accounts, including embedded energy metrics.
    Users,
    /// Material declarations ("offers" in the persisted layout).
    Offers,
    /// On-demand service contracts.
    Services,
    /// Environmental causes receiving point votes.
    Causes,
    /// Community incident reports.
    Reports,
    /// Witness sightings attached to reports.
    Sightings,
}

impl Collection {
    /// All collections, in persisted-layout order.
    pub const ALL: [Collection; 6] = [
        Collection::Users,
        Collection::Offers,
        Collection::Services,
        Collection::Causes,
        Collection::Reports,
        Collection::Sightings,
    ];

    /// The persisted name of this collection.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Offers => "offers",
            Collection::Services => "services",
            Collection::Causes => "causes",
            Collection::Reports => "reports",
            Collection::Sightings => "sightings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
