//! # Change Events
//!
//! Defines the event that flows through the bus after every mutation, and
//! the filter shapes a subscriber can register.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::Collection;

/// Where a mutation originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeOrigin {
    /// Applied by this process.
    Local,
    /// Observed in the shared persistent store, applied by another process.
    CrossProcess,
}

/// A mutation notification for a single entity.
///
/// Carries the post-mutation snapshot so subscribers do not need a read
/// round-trip; `snapshot` is `None` when the entity was deleted or could not
/// be re-read (cross-process observation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Collection the entity lives in.
    pub collection: Collection,
    /// The mutated entity's id.
    pub entity_id: String,
    /// Post-mutation document snapshot.
    pub snapshot: Option<Value>,
    /// Revision after the mutation.
    pub rev: u64,
    /// Where the mutation originated.
    pub origin: ChangeOrigin,
}

/// What a subscription listens to.
///
/// Filters are deliberately narrow: either one entity, or one whole
/// collection. There is no "everything" filter, so a listener cannot receive
/// updates for entities it never subscribed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeFilter {
    /// A single entity, keyed by collection and id.
    Entity {
        /// Collection the entity lives in.
        collection: Collection,
        /// Entity id.
        entity_id: String,
    },
    /// Every entity in one collection (list views).
    Collection(Collection),
}

impl ChangeFilter {
    /// Filter for a single entity.
    #[must_use]
    pub fn entity(collection: Collection, entity_id: impl Into<String>) -> Self {
        ChangeFilter::Entity {
            collection,
            entity_id: entity_id.into(),
        }
    }

    /// Filter for a whole collection.
    #[must_use]
    pub fn collection(collection: Collection) -> Self {
        ChangeFilter::Collection(collection)
    }

    /// Whether `event` should be delivered to this filter.
    #[must_use]
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        match self {
            ChangeFilter::Entity {
                collection,
                entity_id,
            } => *collection == event.collection && *entity_id == event.entity_id,
            ChangeFilter::Collection(collection) => *collection == event.collection,
        }
    }

    /// Stable key used for subscription accounting.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            ChangeFilter::Entity {
                collection,
                entity_id,
            } => format!("{collection}/{entity_id}"),
            ChangeFilter::Collection(collection) => format!("{collection}/*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(collection: Collection, id: &str) -> ChangeEvent {
        ChangeEvent {
            collection,
            entity_id: id.to_string(),
            snapshot: None,
            rev: 1,
            origin: ChangeOrigin::Local,
        }
    }

    #[test]
    fn test_entity_filter_is_exact() {
        let filter = ChangeFilter::entity(Collection::Services, "SRV-1");
        assert!(filter.matches(&event(Collection::Services, "SRV-1")));
        assert!(!filter.matches(&event(Collection::Services, "SRV-2")));
        assert!(!filter.matches(&event(Collection::Offers, "SRV-1")));
    }

    #[test]
    fn test_collection_filter_spans_ids() {
        let filter = ChangeFilter::collection(Collection::Causes);
        assert!(filter.matches(&event(Collection::Causes, "CAU-1")));
        assert!(filter.matches(&event(Collection::Causes, "CAU-2")));
        assert!(!filter.matches(&event(Collection::Users, "USR-1")));
    }

    #[test]
    fn test_filter_keys() {
        assert_eq!(
            ChangeFilter::entity(Collection::Users, "USR-9").key(),
            "users/USR-9"
        );
        assert_eq!(ChangeFilter::collection(Collection::Reports).key(), "reports/*");
    }
}
