//! # Ledger Properties
//!
//! The cross-cutting guarantees of the transaction engine: conservation on
//! transfer, guarded debits that refuse without mutating, idempotent escrow
//! release, and refusals distinguishable from transient faults.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{account, consumer, insert_accounts, test_platform};
    use eco_04_services::NewService;
    use shared_types::{EcoError, ServiceSchedule, UserRole};

    #[tokio::test]
    async fn test_conservation_across_many_transfers() {
        let fixture = test_platform();
        let platform = &fixture.platform;
        insert_accounts(
            platform,
            &[
                account("a", UserRole::Resident, 300.0, 0),
                account("b", UserRole::Resident, 120.0, 0),
                account("c", UserRole::Resident, 80.0, 0),
            ],
        )
        .await;

        for (from, to, amount) in [
            ("a", "b", 35.0),
            ("b", "c", 12.5),
            ("c", "a", 41.0),
            ("a", "c", 7.75),
        ] {
            platform.ledger.transfer(from, to, amount).await.unwrap();
        }

        let total: f64 = balance_total(platform, &["a", "b", "c"]).await;
        assert!((total - 500.0).abs() < 1e-9);
        assert!(platform.ledger.unreconciled().is_empty());
    }

    async fn balance_total(platform: &eco_runtime::Platform, ids: &[&str]) -> f64 {
        let mut total = 0.0;
        for id in ids {
            total += platform.ledger.account(id).await.unwrap().balance;
        }
        total
    }

    #[tokio::test]
    async fn test_guarded_debits_never_mutate_on_refusal() {
        let fixture = test_platform();
        let platform = &fixture.platform;
        insert_accounts(platform, &[account("u", UserRole::Resident, 40.0, 40)]).await;

        assert!(matches!(
            platform.ledger.spend_balance("u", 40.01).await.unwrap_err(),
            EcoError::InsufficientFunds { .. }
        ));
        assert!(matches!(
            platform.ledger.spend_points("u", 41).await.unwrap_err(),
            EcoError::InsufficientPoints { .. }
        ));

        let after = platform.ledger.account("u").await.unwrap();
        assert!((after.balance - 40.0).abs() < 1e-9);
        assert_eq!(after.points, 40);
    }

    #[tokio::test]
    async fn test_vote_rejection_leaves_both_sides_untouched() {
        let fixture = test_platform();
        let platform = &fixture.platform;
        insert_accounts(platform, &[account("voter", UserRole::Resident, 0.0, 40)]).await;

        let cause = platform.causes.create_cause("Tree corridor", 1000).await.unwrap();
        let err = platform.causes.vote("voter", &cause.id, 50).await.unwrap_err();
        assert_eq!(
            err,
            EcoError::InsufficientPoints {
                required: 50,
                available: 40
            }
        );

        assert_eq!(platform.ledger.account("voter").await.unwrap().points, 40);
        let cause = platform.causes.causes().require(&cause.id).await.unwrap();
        assert_eq!(cause.jackpot_points, 0);
        assert_eq!(cause.voters_count, 0);
    }

    #[tokio::test]
    async fn test_release_escrow_is_idempotent() {
        let fixture = test_platform();
        let platform = &fixture.platform;
        insert_accounts(
            platform,
            &[
                account("req", UserRole::Resident, 500.0, 0),
                account("prov", UserRole::Resident, 0.0, 0),
            ],
        )
        .await;

        let service = platform
            .services
            .create_service(NewService {
                requester_id: "req".into(),
                title: "Paint the fence".into(),
                description: "Front fence, two coats".into(),
                category: "REPAIRS".into(),
                requester_offer: 100.0,
            })
            .await
            .unwrap();
        platform.services.bind_provider(&service.id, "prov", None).await.unwrap();
        platform.services.accept_price(&service.id).await.unwrap();
        platform.services.pay_escrow(&service.id, "req").await.unwrap();
        platform
            .services
            .schedule(&service.id, ServiceSchedule::default())
            .await
            .unwrap();

        platform.services.release_escrow(&service.id).await.unwrap();
        for _ in 0..3 {
            let err = platform.services.release_escrow(&service.id).await.unwrap_err();
            assert!(matches!(err, EcoError::AlreadySettled(_)));
        }

        // 100 - 5% fee, exactly once.
        let provider = platform.ledger.account("prov").await.unwrap();
        assert!((provider.balance - 95.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_energy_settlement_matches_fixed_constants() {
        let fixture = test_platform();
        let platform = &fixture.platform;
        insert_accounts(platform, &[consumer("home", 50.0)]).await;

        let receipt = platform.energy.settle_consumer_bill("home", 10.0).await.unwrap();

        let expected_total = (10.0 * 0.3) / 0.9;
        assert!((receipt.total_cost - expected_total).abs() < 1e-9);
        assert!((receipt.platform_fee - expected_total * 0.10).abs() < 1e-9);
        assert!(
            (receipt.producer_payout - (expected_total - receipt.platform_fee)).abs() < 1e-9
        );

        let home = platform.ledger.account("home").await.unwrap();
        assert!((home.balance - (50.0 - expected_total)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_refusals_are_distinguishable_from_faults() {
        let fixture = test_platform();
        let platform = &fixture.platform;
        insert_accounts(platform, &[account("u", UserRole::Resident, 1.0, 1)]).await;

        // Business refusal: prompt the user, don't retry.
        let refusal = platform.ledger.spend_balance("u", 5.0).await.unwrap_err();
        assert!(refusal.is_refusal());

        let missing = platform.ledger.account("ghost").await.unwrap_err();
        assert!(missing.is_refusal());

        // A transient fault would read as retryable instead.
        let fault = EcoError::BackendUnavailable("connection reset".into());
        assert!(!fault.is_refusal());
    }
}
