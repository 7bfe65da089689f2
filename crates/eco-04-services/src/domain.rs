//! Pure negotiation rules: transition legality and the escrow fee.

use shared_types::{AgreementStatus, EcoError, EcoResult, EcoService, ServiceStatus};

/// Platform fee retained on escrow release.
pub const ESCROW_FEE_RATE: f64 = 0.05;

/// Fee retained by the platform for a given negotiated price.
#[must_use]
pub fn escrow_fee(negotiated_price: f64) -> f64 {
    negotiated_price * ESCROW_FEE_RATE
}

/// Check that a provider may bind to the service.
pub fn check_bindable(service: &EcoService) -> EcoResult<()> {
    if service.status != ServiceStatus::Open {
        return Err(EcoError::InvalidTransition {
            id: service.id.clone(),
            operation: "bind_provider",
            from: format!("{:?}", service.status),
        });
    }
    Ok(())
}

/// Check that a counter-offer may still be made.
pub fn check_counterable(service: &EcoService) -> EcoResult<()> {
    if service.status != ServiceStatus::Accepted {
        return Err(EcoError::InvalidTransition {
            id: service.id.clone(),
            operation: "counter_offer",
            from: format!("{:?}", service.status),
        });
    }
    if service.agreement_status == AgreementStatus::Agreed {
        return Err(EcoError::InvalidTransition {
            id: service.id.clone(),
            operation: "counter_offer",
            from: "AGREED".into(),
        });
    }
    Ok(())
}

/// Check that the price may be accepted.
///
/// A provider must be bound and agreement not yet reached. Equal offers are
/// treated as implicit agreement by the surrounding flow, so acceptance is
/// not blocked when the two figures match.
pub fn check_acceptable(service: &EcoService) -> EcoResult<()> {
    if service.status != ServiceStatus::Accepted || service.provider_id.is_none() {
        return Err(EcoError::InvalidTransition {
            id: service.id.clone(),
            operation: "accept_price",
            from: format!("{:?}", service.status),
        });
    }
    if service.agreement_status == AgreementStatus::Agreed {
        return Err(EcoError::InvalidTransition {
            id: service.id.clone(),
            operation: "accept_price",
            from: "AGREED".into(),
        });
    }
    Ok(())
}

/// Check that escrow may be paid.
pub fn check_payable(service: &EcoService) -> EcoResult<()> {
    if service.status == ServiceStatus::Completed {
        return Err(EcoError::AlreadySettled(service.id.clone()));
    }
    if service.status != ServiceStatus::Accepted
        || service.agreement_status != AgreementStatus::Agreed
    {
        return Err(EcoError::InvalidTransition {
            id: service.id.clone(),
            operation: "pay_escrow",
            from: format!("{:?}/{:?}", service.status, service.agreement_status),
        });
    }
    Ok(())
}

/// Check that the service may be scheduled.
pub fn check_schedulable(service: &EcoService) -> EcoResult<()> {
    if service.status != ServiceStatus::TaxPaid {
        return Err(EcoError::InvalidTransition {
            id: service.id.clone(),
            operation: "schedule",
            from: format!("{:?}", service.status),
        });
    }
    Ok(())
}

/// Check that escrow may be released. A `Completed` service refuses with
/// `AlreadySettled` so a second release never double-pays.
pub fn check_releasable(service: &EcoService) -> EcoResult<()> {
    match service.status {
        ServiceStatus::Scheduled => Ok(()),
        ServiceStatus::Completed => Err(EcoError::AlreadySettled(service.id.clone())),
        other => Err(EcoError::InvalidTransition {
            id: service.id.clone(),
            operation: "release_escrow",
            from: format!("{other:?}"),
        }),
    }
}
