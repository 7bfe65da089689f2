//! # Change-Notification Visibility
//!
//! Engine mutations must reach subscribers through the change bus: a watch
//! on one entity sees every write to it and nothing else, a collection
//! watch sees the whole collection, and a second process sharing the mirror
//! directory observes writes after a sync pass.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{account, insert_accounts, test_platform};
    use eco_01_persistence::LocalMirrorStore;
    use shared_bus::{ChangeFilter, ChangeOrigin, InMemoryChangeBus};
    use shared_types::{Collection, UserRole};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_account_watch_sees_ledger_mutations() {
        let fixture = test_platform();
        let platform = &fixture.platform;
        insert_accounts(
            platform,
            &[
                account("a", UserRole::Resident, 100.0, 0),
                account("b", UserRole::Resident, 0.0, 0),
            ],
        )
        .await;

        let (initial, mut changes) = platform.ledger.watch_account("a").await.unwrap();
        assert!((initial.unwrap().balance - 100.0).abs() < 1e-9);

        platform.ledger.transfer("a", "b", 30.0).await.unwrap();

        let event = timeout(Duration::from_millis(200), changes.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(event.entity_id, "a");
        let snapshot = event.snapshot.unwrap();
        assert!((snapshot["balance"].as_f64().unwrap() - 70.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_entity_watch_is_isolated_from_other_entities() {
        let fixture = test_platform();
        let platform = &fixture.platform;
        insert_accounts(
            platform,
            &[
                account("a", UserRole::Resident, 100.0, 0),
                account("b", UserRole::Resident, 100.0, 0),
                account("c", UserRole::Resident, 0.0, 0),
            ],
        )
        .await;

        let (_, mut changes) = platform.ledger.watch_account("c").await.unwrap();

        // Traffic on unrelated accounts must not reach this watch.
        platform.ledger.transfer("a", "b", 10.0).await.unwrap();
        platform.ledger.add_balance("a", 1.0).await.unwrap();

        platform.ledger.add_balance("c", 5.0).await.unwrap();

        let event = timeout(Duration::from_millis(200), changes.recv())
            .await
            .expect("timeout")
            .expect("event");
        assert_eq!(event.entity_id, "c");
    }

    #[tokio::test]
    async fn test_collection_watch_sees_engine_writes() {
        let fixture = test_platform();
        let platform = &fixture.platform;
        insert_accounts(platform, &[account("voter", UserRole::Resident, 0.0, 200)]).await;

        let mut causes_sub = platform.gateway.watch_collection(Collection::Causes);

        let cause = platform.causes.create_cause("Tree corridor", 1000).await.unwrap();
        platform.causes.vote("voter", &cause.id, 50).await.unwrap();

        // Creation event, then the jackpot update.
        let created = causes_sub.recv().await.expect("created event");
        assert_eq!(created.entity_id, cause.id);
        let voted = causes_sub.recv().await.expect("vote event");
        assert_eq!(voted.snapshot.unwrap()["jackpot_points"], 50);
    }

    #[tokio::test]
    async fn test_second_process_observes_after_sync() {
        let dir = tempfile::tempdir().unwrap();

        // Two mirrors on one directory stand in for two processes.
        let writer =
            LocalMirrorStore::open(dir.path(), Arc::new(InMemoryChangeBus::new())).unwrap();
        let reader =
            LocalMirrorStore::open(dir.path(), Arc::new(InMemoryChangeBus::new())).unwrap();

        let mut sub = reader.bus().subscribe(ChangeFilter::collection(Collection::Users));

        use eco_01_persistence::DocumentGateway;
        writer
            .create(
                Collection::Users,
                serde_json::json!({"id": "USR-9", "balance": 1.0}),
            )
            .await
            .unwrap();

        assert_eq!(reader.sync_from_disk().unwrap(), 1);
        let event = sub.recv().await.expect("cross-process event");
        assert_eq!(event.entity_id, "USR-9");
        assert_eq!(event.origin, ChangeOrigin::CrossProcess);
    }
}
