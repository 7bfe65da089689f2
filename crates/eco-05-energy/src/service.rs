//! Energy Credit Engine - injection and settlement over the gateway.

use crate::domain::{settlement_breakdown, EnergyConfig, SettlementReceipt};
use eco_01_persistence::{DocumentGateway, Repository};
use eco_02_ledger::LedgerService;
use serde_json::json;
use shared_types::{
    AssignmentStatus, BillStatus, EcoError, EcoResult, EnergyAssignment, UserAccount,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Converts producer kilowatt-hours into wallet balance, and consumer bill
/// payments into a two-leg settlement persisted on the bill.
pub struct EnergyCreditEngine {
    users: Repository<UserAccount>,
    ledger: Arc<LedgerService>,
    config: EnergyConfig,
}

impl EnergyCreditEngine {
    /// Build the engine over the given store and ledger.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn DocumentGateway>,
        ledger: Arc<LedgerService>,
        config: EnergyConfig,
    ) -> Self {
        Self {
            users: Repository::new(gateway),
            ledger,
            config,
        }
    }

    /// Credit a producer for injected surplus: `credits_balance += kwh`,
    /// `balance += kwh * region_price`.
    pub async fn inject_energy(&self, producer_id: &str, kwh: f64) -> EcoResult<UserAccount> {
        if !kwh.is_finite() || kwh <= 0.0 {
            return Err(EcoError::ValidationError(format!(
                "kWh must be a positive finite number, got {kwh}"
            )));
        }

        let account = self.users.require(producer_id).await?;
        let mut metrics = account.producer.clone().ok_or_else(|| {
            EcoError::ValidationError(format!("{producer_id} is not an energy producer"))
        })?;
        let price = self.config.region_price(&account.region);

        metrics.credits_balance += kwh;
        self.users
            .patch(producer_id, json!({ "producer": metrics }), Some(account.rev))
            .await?;
        self.ledger.add_balance(producer_id, kwh * price).await?;

        info!(
            producer = producer_id,
            kwh,
            price,
            revenue = kwh * price,
            "Energy injected"
        );
        self.users.require(producer_id).await
    }

    /// Settle the consumer's current bill for `kwh` of credits.
    ///
    /// The total is debited in two explicit legs (platform fee, then
    /// producer payout) and each leg's completion is persisted on the bill
    /// before the next step, so a crash mid-settlement is visible in the
    /// stored state (`Processing` with `fee_leg_settled` set) rather than in
    /// lost client-local flags. Funds are checked upfront: an insufficient
    /// balance refuses with no mutation.
    pub async fn settle_consumer_bill(
        &self,
        consumer_id: &str,
        kwh: f64,
    ) -> EcoResult<SettlementReceipt> {
        let receipt = settlement_breakdown(kwh)?;

        let account = self.users.require(consumer_id).await?;
        let mut metrics = account.consumer.clone().ok_or_else(|| {
            EcoError::ValidationError(format!("{consumer_id} is not an energy consumer"))
        })?;
        let Some(mut bill) = metrics.current_bill.clone() else {
            return Err(EcoError::ValidationError(format!(
                "{consumer_id} has no current bill to settle"
            )));
        };
        if bill.status == BillStatus::Paid {
            return Err(EcoError::AlreadySettled(format!("bill of {consumer_id}")));
        }
        if account.balance < receipt.total_cost {
            return Err(EcoError::InsufficientFunds {
                required: receipt.total_cost,
                available: account.balance,
            });
        }

        // Leg 1: platform fee.
        bill.status = BillStatus::Processing;
        self.ledger
            .spend_balance(consumer_id, receipt.platform_fee)
            .await?;
        bill.fee_leg_settled = true;
        metrics.current_bill = Some(bill.clone());
        let account = self
            .users
            .patch(consumer_id, json!({ "consumer": metrics }), None)
            .await?;
        debug!(consumer = consumer_id, fee = receipt.platform_fee, "Fee leg settled");

        // Leg 2: producer payout.
        if let Err(e) = self
            .ledger
            .spend_balance(consumer_id, receipt.producer_payout)
            .await
        {
            warn!(
                consumer = consumer_id,
                error = %e,
                "Payout leg failed; bill left in PROCESSING with fee leg settled"
            );
            return Err(e);
        }
        bill.payout_leg_settled = true;
        bill.status = BillStatus::Paid;
        let mut metrics = account.consumer.clone().unwrap_or_default();
        metrics.current_bill = Some(bill);
        self.users
            .patch(consumer_id, json!({ "consumer": metrics }), None)
            .await?;

        info!(
            consumer = consumer_id,
            kwh,
            total = receipt.total_cost,
            fee = receipt.platform_fee,
            payout = receipt.producer_payout,
            "Bill settled"
        );
        Ok(receipt)
    }

    /// Attach a pending bill-to-credit binding to a producer.
    pub async fn add_assignment(
        &self,
        producer_id: &str,
        assignment: EnergyAssignment,
    ) -> EcoResult<UserAccount> {
        let account = self.users.require(producer_id).await?;
        let mut metrics = account.producer.clone().ok_or_else(|| {
            EcoError::ValidationError(format!("{producer_id} is not an energy producer"))
        })?;
        metrics.assignments.push(assignment);
        self.users
            .patch(producer_id, json!({ "producer": metrics }), Some(account.rev))
            .await
    }

    /// The producer confirms a pending assignment as delivered.
    pub async fn complete_assignment(
        &self,
        producer_id: &str,
        assignment_id: &str,
    ) -> EcoResult<UserAccount> {
        let account = self.users.require(producer_id).await?;
        let mut metrics = account.producer.clone().ok_or_else(|| {
            EcoError::ValidationError(format!("{producer_id} is not an energy producer"))
        })?;

        let assignment = metrics
            .assignments
            .iter_mut()
            .find(|a| a.id == assignment_id)
            .ok_or_else(|| EcoError::EntityNotFound {
                collection: shared_types::Collection::Users,
                id: format!("{producer_id}/assignment/{assignment_id}"),
            })?;
        assignment.status = AssignmentStatus::Completed;

        let updated = self
            .users
            .patch(producer_id, json!({ "producer": metrics }), Some(account.rev))
            .await?;
        debug!(producer = producer_id, assignment = assignment_id, "Assignment completed");
        Ok(updated)
    }
}
