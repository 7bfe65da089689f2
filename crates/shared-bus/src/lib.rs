//! # Shared Bus - Change Notification for Persistence Subscribers
//!
//! The change-notification channel is the only cross-caller visibility
//! mechanism in the platform: there is no read-lock, write-lock, or
//! compare-and-swap between concurrent callers beyond the document revision
//! check at write time.
//!
//! ## Keyed Delivery
//!
//! Subscriptions are keyed by collection and entity id. A subscriber never
//! receives updates for entities it did not subscribe to; a collection-wide
//! subscription is an explicit, separate filter shape used by list views.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Gateway      │                    │ Subscriber   │
//! │ (mutation)   │    publish()       │ (engine/UI)  │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │ Change Bus   │ ─────────┘
//!                  └──────────────┘  subscribe(collection, id)
//! ```
//!
//! ## Ordering
//!
//! Within one entity id, events are delivered in the order mutations were
//! applied by this process. No ordering guarantee is made across ids, and
//! cross-process ordering (local-mirror backend) is best-effort.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{ChangeEvent, ChangeFilter, ChangeOrigin};
pub use publisher::{ChangePublisher, InMemoryChangeBus};
pub use subscriber::{ChangeStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
