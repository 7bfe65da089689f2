//! Causes Voting Engine - point deduction into cause jackpots.

use eco_01_persistence::{DocumentGateway, Repository};
use eco_02_ledger::{LedgerService, LegKind};
use serde_json::json;
use shared_types::{Cause, EcoError, EcoResult, EntityId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Points minted per currency unit when buying point packages.
pub const POINTS_PER_CURRENCY: u64 = 100;

/// Atomic point deduction from a voter into a cause's jackpot.
pub struct CausesVotingEngine {
    causes: Repository<Cause>,
    ledger: Arc<LedgerService>,
}

impl CausesVotingEngine {
    /// Build the engine over the given store and ledger.
    #[must_use]
    pub fn new(gateway: Arc<dyn DocumentGateway>, ledger: Arc<LedgerService>) -> Self {
        Self {
            causes: Repository::new(gateway),
            ledger,
        }
    }

    /// The cause repository, for list views at the contract boundary.
    #[must_use]
    pub fn causes(&self) -> Repository<Cause> {
        self.causes.clone()
    }

    /// Register a cause with a fresh `CAU-` id and an empty jackpot.
    pub async fn create_cause(&self, title: &str, target_points: u64) -> EcoResult<Cause> {
        if title.is_empty() {
            return Err(EcoError::ValidationError("cause title must not be empty".into()));
        }
        if target_points == 0 {
            return Err(EcoError::ValidationError(
                "cause target must be positive".into(),
            ));
        }
        let cause = Cause {
            id: EntityId::Cause.mint(),
            rev: 0,
            title: title.to_string(),
            jackpot_points: 0,
            target_points,
            voters_count: 0,
        };
        self.causes.insert(&cause).await
    }

    /// Vote `points` from a user into a cause's jackpot.
    ///
    /// Refuses with `InsufficientPoints` and mutates nothing when the voter
    /// cannot cover the vote. On success the voter debit and the cause
    /// credit are two writes journaled as one movement; a credit that never
    /// lands leaves a visible journal entry instead of vanished points.
    pub async fn vote(&self, user_id: &str, cause_id: &str, points: u64) -> EcoResult<Cause> {
        if points == 0 {
            return Err(EcoError::ValidationError("vote must carry points".into()));
        }

        // Fail fast on a missing cause before touching the voter.
        let cause = self.causes.require(cause_id).await?;

        let seq = self
            .ledger
            .journal_begin(user_id, cause_id, points as f64, LegKind::Points);

        if let Err(e) = self.ledger.spend_points(user_id, points).await {
            self.ledger.journal_aborted(seq);
            return Err(e);
        }
        self.ledger.journal_debited(seq);

        let patched = self
            .causes
            .patch(
                cause_id,
                json!({
                    "jackpot_points": cause.jackpot_points + points,
                    "voters_count": cause.voters_count + 1,
                }),
                Some(cause.rev),
            )
            .await;
        match patched {
            Ok(updated) => {
                self.ledger.journal_reconciled(seq);
                info!(user = user_id, cause = cause_id, points, "Vote counted");
                Ok(updated)
            }
            Err(e) => {
                warn!(
                    user = user_id,
                    cause = cause_id,
                    points,
                    error = %e,
                    "Jackpot credit failed after point debit; journal entry left unreconciled"
                );
                Err(e)
            }
        }
    }

    /// Credit activity points (ad rewards, missions) to a user.
    pub async fn earn_points(&self, user_id: &str, amount: u64, reason: &str) -> EcoResult<()> {
        self.ledger.add_points(user_id, amount).await?;
        debug!(user = user_id, amount, reason, "Points earned");
        Ok(())
    }

    /// Buy a point package: debits `spend` currency, credits
    /// `spend * POINTS_PER_CURRENCY` points.
    pub async fn buy_points(&self, user_id: &str, spend: f64) -> EcoResult<u64> {
        if !spend.is_finite() || spend <= 0.0 {
            return Err(EcoError::ValidationError(
                "spend must be a positive finite number".into(),
            ));
        }
        let points = (spend * POINTS_PER_CURRENCY as f64).floor() as u64;
        if points == 0 {
            return Err(EcoError::ValidationError(
                "spend too small to mint a point".into(),
            ));
        }

        let seq = self
            .ledger
            .journal_begin(user_id, user_id, spend, LegKind::Balance);
        if let Err(e) = self.ledger.spend_balance(user_id, spend).await {
            self.ledger.journal_aborted(seq);
            return Err(e);
        }
        self.ledger.journal_debited(seq);

        match self.ledger.add_points(user_id, points).await {
            Ok(()) => {
                self.ledger.journal_reconciled(seq);
                info!(user = user_id, spend, points, "Point package bought");
                Ok(points)
            }
            Err(e) => {
                warn!(
                    user = user_id,
                    spend,
                    error = %e,
                    "Point mint failed after debit; journal entry left unreconciled"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_01_persistence::LocalMirrorStore;
    use shared_bus::InMemoryChangeBus;
    use shared_types::{UserAccount, UserRole};

    fn user(id: &str, balance: f64, points: u64) -> UserAccount {
        UserAccount {
            id: id.to_string(),
            rev: 0,
            name: id.to_string(),
            role: UserRole::Resident,
            balance,
            points,
            total_recycled_kg: 0.0,
            region: "SP".into(),
            producer: None,
            consumer: None,
        }
    }

    async fn engine(
        dir: &std::path::Path,
        accounts: &[UserAccount],
    ) -> (CausesVotingEngine, Arc<LedgerService>) {
        let store: Arc<dyn DocumentGateway> =
            Arc::new(LocalMirrorStore::open(dir, Arc::new(InMemoryChangeBus::new())).unwrap());
        let ledger = Arc::new(LedgerService::new(store.clone()));
        for account in accounts {
            ledger.users().insert(account).await.unwrap();
        }
        (CausesVotingEngine::new(store, ledger.clone()), ledger)
    }

    #[tokio::test]
    async fn test_vote_moves_points_into_jackpot() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, ledger) = engine(dir.path(), &[user("voter", 0.0, 120)]).await;

        let cause = engine.create_cause("River cleanup", 5000).await.unwrap();
        let updated = engine.vote("voter", &cause.id, 50).await.unwrap();

        assert_eq!(updated.jackpot_points, 50);
        assert_eq!(updated.voters_count, 1);
        assert_eq!(ledger.account("voter").await.unwrap().points, 70);
        assert!(ledger.unreconciled().is_empty());
    }

    #[tokio::test]
    async fn test_vote_rejected_without_points() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, ledger) = engine(dir.path(), &[user("voter", 0.0, 40)]).await;

        let cause = engine.create_cause("River cleanup", 5000).await.unwrap();
        let err = engine.vote("voter", &cause.id, 50).await.unwrap_err();
        assert_eq!(
            err,
            EcoError::InsufficientPoints {
                required: 50,
                available: 40
            }
        );

        // Refusal mutated nothing on either side.
        assert_eq!(ledger.account("voter").await.unwrap().points, 40);
        let cause = engine.causes().require(&cause.id).await.unwrap();
        assert_eq!(cause.jackpot_points, 0);
        assert_eq!(cause.voters_count, 0);
        assert!(ledger.unreconciled().is_empty());
    }

    #[tokio::test]
    async fn test_vote_on_missing_cause_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, ledger) = engine(dir.path(), &[user("voter", 0.0, 100)]).await;

        let err = engine.vote("voter", "CAU-404", 10).await.unwrap_err();
        assert!(matches!(err, EcoError::EntityNotFound { .. }));
        assert_eq!(ledger.account("voter").await.unwrap().points, 100);
    }

    #[tokio::test]
    async fn test_jackpot_accumulates_across_voters() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, _) =
            engine(dir.path(), &[user("a", 0.0, 100), user("b", 0.0, 100)]).await;

        let cause = engine.create_cause("Mangrove restoration", 1000).await.unwrap();
        engine.vote("a", &cause.id, 30).await.unwrap();
        let updated = engine.vote("b", &cause.id, 20).await.unwrap();

        assert_eq!(updated.jackpot_points, 50);
        assert_eq!(updated.voters_count, 2);
    }

    #[tokio::test]
    async fn test_earn_and_buy_points() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, ledger) = engine(dir.path(), &[user("u", 10.0, 0)]).await;

        engine.earn_points("u", 20, "ad reward").await.unwrap();
        assert_eq!(ledger.account("u").await.unwrap().points, 20);

        let minted = engine.buy_points("u", 5.0).await.unwrap();
        assert_eq!(minted, 500);
        let account = ledger.account("u").await.unwrap();
        assert_eq!(account.points, 520);
        assert!((account.balance - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_buy_points_refuses_without_funds() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, ledger) = engine(dir.path(), &[user("u", 1.0, 0)]).await;

        let err = engine.buy_points("u", 5.0).await.unwrap_err();
        assert!(matches!(err, EcoError::InsufficientFunds { .. }));
        assert_eq!(ledger.account("u").await.unwrap().points, 0);
    }
}
