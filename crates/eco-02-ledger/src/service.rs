//! Ledger Service - balance and point transfer primitives.
//!
//! Every operation is a sequence of awaited single-account reads and writes
//! against the persistence gateway; interleaving with concurrent callers
//! happens only at those suspension points. A write carries the revision the
//! operation read, so a concurrent writer surfaces as `VersionConflict`
//! rather than a silent overwrite.

use crate::journal::{LegKind, TransferEntry, TransferJournal};
use eco_01_persistence::{DocumentGateway, Repository};
use parking_lot::Mutex;
use serde_json::json;
use shared_bus::Subscription;
use shared_types::{EcoError, EcoResult, UserAccount};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Balance/points/credit transfer primitives built on the persistence
/// gateway: read the current snapshot, compute the new value, write it back.
///
/// All operations are idempotent-by-caller; none retries automatically.
pub struct LedgerService {
    users: Repository<UserAccount>,
    journal: Mutex<TransferJournal>,
}

impl LedgerService {
    /// Build a ledger over the given store.
    #[must_use]
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        Self {
            users: Repository::new(gateway),
            journal: Mutex::new(TransferJournal::new()),
        }
    }

    /// Account lookup for the contract boundary.
    pub async fn account(&self, user_id: &str) -> EcoResult<UserAccount> {
        self.users.require(user_id).await
    }

    /// Account subscribe for the contract boundary: current snapshot plus
    /// subsequent mutations.
    pub async fn watch_account(
        &self,
        user_id: &str,
    ) -> EcoResult<(Option<UserAccount>, Subscription)> {
        self.users.watch(user_id).await
    }

    /// The user repository, for engines that patch non-ledger fields.
    #[must_use]
    pub fn users(&self) -> Repository<UserAccount> {
        self.users.clone()
    }

    /// Transfers this process started whose credit leg never landed.
    #[must_use]
    pub fn unreconciled(&self) -> Vec<TransferEntry> {
        self.journal.lock().unreconciled()
    }

    /// Move monetary balance between two accounts.
    ///
    /// Two single-account writes, journaled. The debit is unconditional:
    /// transfer sources (drop-off points fronting cash) are allowed to go
    /// negative. If the credit write fails after the debit succeeded, the
    /// debit is NOT rolled back; the journal entry is left in
    /// `DebitApplied` and the error is returned for the caller to decide.
    pub async fn transfer(&self, from_id: &str, to_id: &str, amount: f64) -> EcoResult<()> {
        validate_amount(amount)?;

        let seq = self
            .journal
            .lock()
            .begin(from_id, to_id, amount, LegKind::Balance);

        let from = match self.users.require(from_id).await {
            Ok(account) => account,
            Err(e) => {
                self.journal.lock().mark_aborted(seq);
                return Err(e);
            }
        };
        if let Err(e) = self
            .users
            .patch(
                from_id,
                json!({ "balance": from.balance - amount }),
                Some(from.rev),
            )
            .await
        {
            self.journal.lock().mark_aborted(seq);
            return Err(e);
        }
        self.journal.lock().mark_debited(seq);

        let credit = async {
            let to = self.users.require(to_id).await?;
            self.users
                .patch(to_id, json!({ "balance": to.balance + amount }), Some(to.rev))
                .await
        };
        match credit.await {
            Ok(_) => {
                self.journal.lock().mark_reconciled(seq);
                info!(from = from_id, to = to_id, amount, "Transfer applied");
                Ok(())
            }
            Err(e) => {
                error!(
                    from = from_id,
                    to = to_id,
                    amount,
                    error = %e,
                    "Credit leg failed after debit; journal entry left unreconciled"
                );
                Err(e)
            }
        }
    }

    /// Unconditional monetary credit.
    pub async fn add_balance(&self, user_id: &str, amount: f64) -> EcoResult<()> {
        validate_amount(amount)?;
        let account = self.users.require(user_id).await?;
        self.users
            .patch(
                user_id,
                json!({ "balance": account.balance + amount }),
                Some(account.rev),
            )
            .await?;
        debug!(user = user_id, amount, "Balance credited");
        Ok(())
    }

    /// Unconditional point credit.
    pub async fn add_points(&self, user_id: &str, amount: u64) -> EcoResult<()> {
        if amount == 0 {
            return Err(EcoError::ValidationError("point amount must be positive".into()));
        }
        let account = self.users.require(user_id).await?;
        self.users
            .patch(
                user_id,
                json!({ "points": account.points + amount }),
                Some(account.rev),
            )
            .await?;
        debug!(user = user_id, amount, "Points credited");
        Ok(())
    }

    /// Guarded monetary debit: refuses with `InsufficientFunds` and mutates
    /// nothing when the balance does not cover `amount`.
    pub async fn spend_balance(&self, user_id: &str, amount: f64) -> EcoResult<()> {
        validate_amount(amount)?;
        let account = self.users.require(user_id).await?;
        if account.balance < amount {
            return Err(EcoError::InsufficientFunds {
                required: amount,
                available: account.balance,
            });
        }
        self.users
            .patch(
                user_id,
                json!({ "balance": account.balance - amount }),
                Some(account.rev),
            )
            .await?;
        debug!(user = user_id, amount, "Balance debited");
        Ok(())
    }

    /// Guarded point debit: refuses with `InsufficientPoints` and mutates
    /// nothing when the point balance does not cover `amount`.
    pub async fn spend_points(&self, user_id: &str, amount: u64) -> EcoResult<()> {
        if amount == 0 {
            return Err(EcoError::ValidationError("point amount must be positive".into()));
        }
        let account = self.users.require(user_id).await?;
        if account.points < amount {
            return Err(EcoError::InsufficientPoints {
                required: amount,
                available: account.points,
            });
        }
        self.users
            .patch(
                user_id,
                json!({ "points": account.points - amount }),
                Some(account.rev),
            )
            .await?;
        debug!(user = user_id, amount, "Points debited");
        Ok(())
    }

    /// Journal a two-leg point movement driven by another engine (voting).
    /// The ledger owns the journal so every half-applied movement is found
    /// in one place.
    pub fn journal_begin(&self, debit: &str, credit: &str, amount: f64, kind: LegKind) -> u64 {
        self.journal.lock().begin(debit, credit, amount, kind)
    }

    /// Mark a journaled movement's debit leg applied.
    pub fn journal_debited(&self, seq: u64) {
        self.journal.lock().mark_debited(seq);
    }

    /// Mark a journaled movement reconciled.
    pub fn journal_reconciled(&self, seq: u64) {
        self.journal.lock().mark_reconciled(seq);
    }

    /// Mark a journaled movement aborted before mutation.
    pub fn journal_aborted(&self, seq: u64) {
        self.journal.lock().mark_aborted(seq);
    }
}

/// Monetary amounts must be positive finite numbers.
fn validate_amount(amount: f64) -> EcoResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EcoError::ValidationError(format!(
            "amount must be a positive finite number, got {amount}"
        )));
    }
    Ok(())
}
