//! Service Negotiation Engine - demand lifecycle over the gateway.

use crate::domain::{
    check_acceptable, check_bindable, check_counterable, check_payable, check_releasable,
    check_schedulable, escrow_fee,
};
use eco_01_persistence::{DocumentGateway, Repository};
use eco_02_ledger::{LedgerService, LegKind};
use serde_json::json;
use shared_types::{
    AgreementStatus, EcoError, EcoResult, EcoService, EntityId, ServiceSchedule, ServiceStatus,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fields a requester supplies when opening a demand.
#[derive(Debug, Clone)]
pub struct NewService {
    /// Requesting account id.
    pub requester_id: String,
    /// Short title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Category tag.
    pub category: String,
    /// The requester's opening offer.
    pub requester_offer: f64,
}

/// State machine for on-demand services: open demand, provider binding,
/// alternating counter-offers, mutual agreement, escrow payment,
/// scheduling, completion and release.
pub struct ServiceNegotiationEngine {
    services: Repository<EcoService>,
    ledger: Arc<LedgerService>,
}

impl ServiceNegotiationEngine {
    /// Build the engine over the given store and ledger.
    #[must_use]
    pub fn new(gateway: Arc<dyn DocumentGateway>, ledger: Arc<LedgerService>) -> Self {
        Self {
            services: Repository::new(gateway),
            ledger,
        }
    }

    /// The service repository, for list views at the contract boundary.
    #[must_use]
    pub fn services(&self) -> Repository<EcoService> {
        self.services.clone()
    }

    /// Open a demand with a fresh `SRV-` id. The negotiated price starts at
    /// the requester's offer.
    pub async fn create_service(&self, new: NewService) -> EcoResult<EcoService> {
        if !new.requester_offer.is_finite() || new.requester_offer <= 0.0 {
            return Err(EcoError::ValidationError(
                "requester offer must be positive".into(),
            ));
        }
        if new.title.is_empty() {
            return Err(EcoError::ValidationError("title must not be empty".into()));
        }

        let service = EcoService {
            id: EntityId::Service.mint(),
            rev: 0,
            requester_id: new.requester_id,
            provider_id: None,
            title: new.title,
            description: new.description,
            category: new.category,
            requester_offer: new.requester_offer,
            provider_offer: None,
            negotiated_price: new.requester_offer,
            status: ServiceStatus::Open,
            agreement_status: AgreementStatus::WaitingProvider,
            agreed_scope: None,
            schedule: None,
        };
        let stored = self.services.insert(&service).await?;
        info!(id = %stored.id, requester = %stored.requester_id, offer = stored.requester_offer, "Demand opened");
        Ok(stored)
    }

    /// A provider binds to an open demand, optionally narrowing the scope.
    pub async fn bind_provider(
        &self,
        service_id: &str,
        provider_id: &str,
        scope: Option<&str>,
    ) -> EcoResult<EcoService> {
        let service = self.services.require(service_id).await?;
        check_bindable(&service)?;

        let mut patch = json!({
            "status": ServiceStatus::Accepted,
            "agreement_status": AgreementStatus::Negotiating,
            "provider_id": provider_id,
        });
        if let Some(scope) = scope {
            patch["agreed_scope"] = json!(scope);
        }

        let updated = self.services.patch(service_id, patch, Some(service.rev)).await?;
        debug!(id = service_id, provider = provider_id, "Provider bound");
        Ok(updated)
    }

    /// Either side counters. Updates the countering side's offer and the
    /// negotiated price; a provider counter may also update the scope.
    /// Counters may repeat from either side; no turn-taking is enforced.
    pub async fn counter_offer(
        &self,
        service_id: &str,
        amount: f64,
        is_provider: bool,
        scope: Option<&str>,
    ) -> EcoResult<EcoService> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(EcoError::ValidationError(
                "counter-offer must be positive".into(),
            ));
        }

        let service = self.services.require(service_id).await?;
        check_counterable(&service)?;

        let mut patch = json!({ "negotiated_price": amount });
        if is_provider {
            patch["provider_offer"] = json!(amount);
            if let Some(scope) = scope {
                patch["agreed_scope"] = json!(scope);
            }
        } else {
            patch["requester_offer"] = json!(amount);
        }

        let updated = self.services.patch(service_id, patch, Some(service.rev)).await?;
        debug!(
            id = service_id,
            amount,
            is_provider,
            "Counter-offer recorded"
        );
        Ok(updated)
    }

    /// The accepting party adopts the counterpart's most recent figure,
    /// which the negotiated price already reflects. Marks agreement.
    pub async fn accept_price(&self, service_id: &str) -> EcoResult<EcoService> {
        let service = self.services.require(service_id).await?;
        check_acceptable(&service)?;

        let updated = self
            .services
            .patch(
                service_id,
                json!({ "agreement_status": AgreementStatus::Agreed }),
                Some(service.rev),
            )
            .await?;
        info!(id = service_id, price = updated.negotiated_price, "Price agreed");
        Ok(updated)
    }

    /// The requester pays the negotiated price into custody. Guarded: an
    /// insufficient balance refuses with no mutation.
    pub async fn pay_escrow(&self, service_id: &str, payer_id: &str) -> EcoResult<EcoService> {
        let service = self.services.require(service_id).await?;
        check_payable(&service)?;
        if payer_id != service.requester_id {
            return Err(EcoError::ValidationError(format!(
                "escrow for {service_id} is paid by its requester"
            )));
        }

        self.ledger
            .spend_balance(payer_id, service.negotiated_price)
            .await?;

        let updated = self
            .services
            .patch(
                service_id,
                json!({ "status": ServiceStatus::TaxPaid }),
                Some(service.rev),
            )
            .await?;
        info!(
            id = service_id,
            payer = payer_id,
            amount = service.negotiated_price,
            "Escrow paid into custody"
        );
        Ok(updated)
    }

    /// Both sides confirmed a meeting.
    pub async fn schedule(
        &self,
        service_id: &str,
        schedule: ServiceSchedule,
    ) -> EcoResult<EcoService> {
        let service = self.services.require(service_id).await?;
        check_schedulable(&service)?;

        let updated = self
            .services
            .patch(
                service_id,
                json!({
                    "status": ServiceStatus::Scheduled,
                    "schedule": schedule,
                }),
                Some(service.rev),
            )
            .await?;
        debug!(id = service_id, "Service scheduled");
        Ok(updated)
    }

    /// Release custody to the provider, net of the 5% platform fee.
    /// Terminal. The status write is revision-guarded and happens before
    /// the credit, so two concurrent releases cannot both pay; an already
    /// `Completed` service refuses with `AlreadySettled`.
    pub async fn release_escrow(&self, service_id: &str) -> EcoResult<EcoService> {
        let service = self.services.require(service_id).await?;
        check_releasable(&service)?;

        let provider_id = service.provider_id.clone().ok_or_else(|| {
            EcoError::ValidationError(format!("{service_id} has no provider to pay"))
        })?;

        let fee = escrow_fee(service.negotiated_price);
        let payout = service.negotiated_price - fee;

        let seq =
            self.ledger
                .journal_begin(&format!("escrow:{service_id}"), &provider_id, payout, LegKind::Balance);

        // Claim completion first; the revision check makes this a
        // single-winner write.
        let updated = match self
            .services
            .patch(
                service_id,
                json!({ "status": ServiceStatus::Completed }),
                Some(service.rev),
            )
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                self.ledger.journal_aborted(seq);
                return Err(e);
            }
        };
        self.ledger.journal_debited(seq);

        match self.ledger.add_balance(&provider_id, payout).await {
            Ok(()) => {
                self.ledger.journal_reconciled(seq);
                info!(
                    id = service_id,
                    provider = %provider_id,
                    payout,
                    fee,
                    "Escrow released"
                );
                Ok(updated)
            }
            Err(e) => {
                warn!(
                    id = service_id,
                    provider = %provider_id,
                    payout,
                    error = %e,
                    "Payout failed after completion; journal entry left unreconciled"
                );
                Err(e)
            }
        }
    }
}
