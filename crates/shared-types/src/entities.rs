//! # Core Domain Entities
//!
//! Defines the marketplace entities persisted in the named collections.
//!
//! ## Clusters
//!
//! - **Accounts**: `UserAccount` with embedded producer/consumer energy metrics
//! - **Materials**: `MaterialDeclaration` and its lifecycle status
//! - **Services**: `EcoService`, negotiation sub-state, schedule
//! - **Causes & Community**: `Cause`, `Report`, `Sighting`
//!
//! Entities are plain data. Lifecycle legality lives in the engine crates;
//! balance and point mutation lives in the ledger subsystem.

use crate::collections::Collection;
use crate::ids::TimestampMillis;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Marker trait tying an entity to its collection.
///
/// Implemented by every persisted entity so the typed repository can
/// round-trip it through the document gateway.
pub trait Persistable: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The collection this entity is stored in.
    const COLLECTION: Collection;

    /// The entity's id within the collection.
    fn id(&self) -> &str;

    /// The revision this entity was read at.
    fn rev(&self) -> u64;

    /// Overwrite the revision after a persisted write.
    fn set_rev(&mut self, rev: u64);
}

// =============================================================================
// CLUSTER A: ACCOUNTS
// =============================================================================

/// Roles a user can act under. A single account holds one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Declares recyclable material for collection.
    Resident,
    /// Transports declared material to a drop-off point.
    Collector,
    /// Drop-off point that liquidates material for cash.
    Point,
    /// Injects renewable-energy surplus as sellable credits.
    Producer,
    /// Buys energy credits to offset bills.
    Consumer,
}

/// Status of a consumer's current energy bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    /// Awaiting settlement.
    #[default]
    Pending,
    /// Settlement started; one or both legs may be outstanding.
    Processing,
    /// Fully settled.
    Paid,
}

/// A consumer's current energy bill.
///
/// The two `*_leg_settled` flags persist the dual-leg settlement state on the
/// entity itself so it survives a client restart and can be verified
/// independently of any in-flight operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EnergyBill {
    /// Original bill value in currency units.
    pub original_value: f64,
    /// Due date, milliseconds since the UNIX epoch.
    pub due_date: TimestampMillis,
    /// Settlement status.
    pub status: BillStatus,
    /// Platform-fee leg has been debited.
    #[serde(default)]
    pub fee_leg_settled: bool,
    /// Producer-payout leg has been debited.
    #[serde(default)]
    pub payout_leg_settled: bool,
}

/// Status of a pending bill-to-credit binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    /// Awaiting producer confirmation.
    #[default]
    Pending,
    /// Confirmed delivered by the producer.
    Completed,
}

/// A pending bill-to-credit binding between a consumer and a producer
/// installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyAssignment {
    /// Assignment id.
    pub id: String,
    /// Display label of the consumer being served.
    pub consumer_label: String,
    /// Producer installation id serving the assignment.
    pub installation_id: String,
    /// Energy amount in kWh.
    pub kwh: f64,
    /// Platform fee attached to this assignment, in currency units.
    pub platform_fee: f64,
    /// Assignment status.
    pub status: AssignmentStatus,
}

/// Energy-producer metrics embedded in a user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProducerMetrics {
    /// Sellable credit balance in kWh.
    pub credits_balance: f64,
    /// Pending bill-assignments served by this producer.
    #[serde(default)]
    pub assignments: Vec<EnergyAssignment>,
}

/// Energy-consumer metrics embedded in a user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConsumerMetrics {
    /// The consumer's current bill, if any.
    pub current_bill: Option<EnergyBill>,
}

/// A user account. Balance and points are never mutated except through a
/// ledger operation; no operation may leave them undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Account id.
    pub id: String,
    /// Revision counter, bumped on every persisted write.
    #[serde(default)]
    pub rev: u64,
    /// Display name.
    pub name: String,
    /// Role this account acts under.
    pub role: UserRole,
    /// Monetary balance in currency units.
    pub balance: f64,
    /// Reputation point balance.
    pub points: u64,
    /// Accumulated recycled mass in kg.
    pub total_recycled_kg: f64,
    /// Region tag used for energy pricing.
    pub region: String,
    /// Energy-producer metrics, present on producer accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<ProducerMetrics>,
    /// Energy-consumer metrics, present on consumer accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<ConsumerMetrics>,
}

impl Persistable for UserAccount {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }

    fn rev(&self) -> u64 {
        self.rev
    }

    fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }
}

// =============================================================================
// CLUSTER B: MATERIALS
// =============================================================================

/// Lifecycle status of a material declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeclarationStatus {
    /// Created by a resident, awaiting approval or pickup.
    Pending,
    /// Approved for collection.
    Approved,
    /// A collector accepted the declaration.
    CollectorAssigned,
    /// Collector confirmed the actual weight; final value is locked.
    Collected,
    /// Dropped off at a point of sale.
    Delivered,
    /// Liquidated at a point of sale. Terminal.
    Completed,
}

impl DeclarationStatus {
    /// Whether the declaration has reached its terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, DeclarationStatus::Completed)
    }
}

/// A street location attached to a declaration or report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GeoLocation {
    /// Street address for display and routing.
    pub address: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// A recyclable-material declaration, from creation through collection to
/// point-of-sale liquidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDeclaration {
    /// Declaration id (`ECO-…`).
    pub id: String,
    /// Revision counter, bumped on every persisted write.
    #[serde(default)]
    pub rev: u64,
    /// Owning resident's account id.
    pub resident_id: String,
    /// Material type (e.g. "PET", "ALUMINUM").
    pub material: String,
    /// Declared quantity in items or units.
    pub quantity: u32,
    /// Estimated weight in kg.
    pub estimated_weight: f64,
    /// Estimated value in currency units. Re-scaled when the actual weight
    /// is confirmed: the per-unit value implied by the original estimate is
    /// preserved, not re-derived.
    pub estimated_value: f64,
    /// Pickup location.
    pub location: GeoLocation,
    /// Lifecycle status.
    pub status: DeclarationStatus,
    /// Assigned collector, once accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_id: Option<String>,
    /// Liquidating point of sale, once settled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_id: Option<String>,
    /// Weighed mass at pickup, in kg.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_weight: Option<f64>,
}

impl Persistable for MaterialDeclaration {
    const COLLECTION: Collection = Collection::Offers;

    fn id(&self) -> &str {
        &self.id
    }

    fn rev(&self) -> u64 {
        self.rev
    }

    fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }
}

// =============================================================================
// CLUSTER C: SERVICES
// =============================================================================

/// Overall lifecycle status of an on-demand service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    /// Open demand, no provider bound.
    Open,
    /// Provider bound; price and scope under negotiation.
    Accepted,
    /// Escrow debit succeeded; funds held by the platform.
    TaxPaid,
    /// Both sides confirmed a meeting.
    Scheduled,
    /// Released to the provider. Terminal.
    Completed,
}

/// Negotiation sub-state, independent of the overall lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementStatus {
    /// No provider has bound yet.
    WaitingProvider,
    /// Counter-offers may flow from either side.
    Negotiating,
    /// A price was accepted; escrow may proceed.
    Agreed,
}

/// An agreed meeting for a scheduled service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ServiceSchedule {
    /// Calendar date, ISO `YYYY-MM-DD`.
    pub date: String,
    /// Time of day, `HH:MM`.
    pub time: String,
    /// Address or meeting link.
    pub location: String,
    /// Whether the service is performed remotely.
    #[serde(default)]
    pub is_remote: bool,
}

/// An on-demand service: open demand, provider binding, alternating
/// counter-offers, mutual agreement, escrow payment, scheduling, release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcoService {
    /// Service id (`SRV-…`).
    pub id: String,
    /// Revision counter, bumped on every persisted write.
    #[serde(default)]
    pub rev: u64,
    /// Requesting account id.
    pub requester_id: String,
    /// Bound provider account id, once accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Short title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Category tag (e.g. "REPAIRS").
    pub category: String,
    /// The requester's most recent offer.
    pub requester_offer: f64,
    /// The provider's most recent offer, once made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_offer: Option<f64>,
    /// Always the most recent accepted or countered figure from either party.
    pub negotiated_price: f64,
    /// Overall lifecycle status.
    pub status: ServiceStatus,
    /// Negotiation sub-state.
    pub agreement_status: AgreementStatus,
    /// Agreed scope text, if the provider narrowed the work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreed_scope: Option<String>,
    /// Meeting details, once scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ServiceSchedule>,
}

impl Persistable for EcoService {
    const COLLECTION: Collection = Collection::Services;

    fn id(&self) -> &str {
        &self.id
    }

    fn rev(&self) -> u64 {
        self.rev
    }

    fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }
}

// =============================================================================
// CLUSTER D: CAUSES & COMMUNITY
// =============================================================================

/// An environmental cause receiving point votes. The jackpot never decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cause {
    /// Cause id (`CAU-…`).
    pub id: String,
    /// Revision counter, bumped on every persisted write.
    #[serde(default)]
    pub rev: u64,
    /// Display title.
    pub title: String,
    /// Cumulative point total backing the cause.
    pub jackpot_points: u64,
    /// Funding target in points.
    pub target_points: u64,
    /// Number of votes cast.
    pub voters_count: u64,
}

impl Persistable for Cause {
    const COLLECTION: Collection = Collection::Causes;

    fn id(&self) -> &str {
        &self.id
    }

    fn rev(&self) -> u64 {
        self.rev
    }

    fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }
}

/// A community incident report with an evidence-support counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Report id (`REP-…`).
    pub id: String,
    /// Revision counter, bumped on every persisted write.
    #[serde(default)]
    pub rev: u64,
    /// Reporting account id.
    pub reporter_id: String,
    /// Incident category (e.g. "ILLEGAL_DUMPING").
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Incident location.
    pub location: GeoLocation,
    /// Accounts that support this report. One support per account.
    #[serde(default)]
    pub supporters: Vec<String>,
    /// Creation time, for display ordering only.
    pub created_at: TimestampMillis,
}

impl Persistable for Report {
    const COLLECTION: Collection = Collection::Reports;

    fn id(&self) -> &str {
        &self.id
    }

    fn rev(&self) -> u64 {
        self.rev
    }

    fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }
}

/// A witness sighting attached to a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    /// Sighting id (`WIT-…`).
    pub id: String,
    /// Revision counter, bumped on every persisted write.
    #[serde(default)]
    pub rev: u64,
    /// The report this sighting supports.
    pub report_id: String,
    /// Witnessing account id.
    pub witness_id: String,
    /// Free-text note.
    pub note: String,
    /// Creation time, for display ordering only.
    pub created_at: TimestampMillis,
}

impl Persistable for Sighting {
    const COLLECTION: Collection = Collection::Sightings;

    fn id(&self) -> &str {
        &self.id
    }

    fn rev(&self) -> u64 {
        self.rev
    }

    fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }
}
