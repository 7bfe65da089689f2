//! Pure lifecycle rules: transition legality, value re-scaling, the
//! liquidation split.

use shared_types::{DeclarationStatus, EcoError, EcoResult};

/// Resident's share of the liquidated value.
pub const RESIDENT_SHARE: f64 = 0.70;

/// Collector's share of the liquidated value.
pub const COLLECTOR_SHARE: f64 = 0.30;

/// Re-scale the estimated value to the weighed mass.
///
/// The per-unit value implied by the original estimate is preserved, not
/// re-derived: `value * (actual / estimated)`.
#[must_use]
pub fn rescale_value(estimated_value: f64, estimated_weight: f64, actual_weight: f64) -> f64 {
    estimated_value * (actual_weight / estimated_weight)
}

/// Split a liquidated value into (resident share, collector share).
#[must_use]
pub fn liquidation_shares(value: f64) -> (f64, f64) {
    (value * RESIDENT_SHARE, value * COLLECTOR_SHARE)
}

/// Check that a collector may accept the declaration.
pub fn check_acceptable(id: &str, status: DeclarationStatus) -> EcoResult<()> {
    match status {
        DeclarationStatus::Pending | DeclarationStatus::Approved => Ok(()),
        other => Err(EcoError::InvalidTransition {
            id: id.to_string(),
            operation: "accept_by_collector",
            from: format!("{other:?}"),
        }),
    }
}

/// Check that the actual weight may still be confirmed.
pub fn check_weighable(id: &str, status: DeclarationStatus) -> EcoResult<()> {
    match status {
        DeclarationStatus::Pending
        | DeclarationStatus::Approved
        | DeclarationStatus::CollectorAssigned => Ok(()),
        other => Err(EcoError::InvalidTransition {
            id: id.to_string(),
            operation: "confirm_weight",
            from: format!("{other:?}"),
        }),
    }
}
