//! Shared builders for integration tests: a platform on a fresh local
//! mirror plus the standard cast of accounts.

use eco_runtime::{Platform, PlatformConfig};
use shared_types::{
    BillStatus, ConsumerMetrics, EnergyBill, ProducerMetrics, UserAccount, UserRole,
};
use tempfile::TempDir;

/// A platform wired over a throwaway mirror directory. The directory guard
/// must outlive the platform.
pub struct TestPlatform {
    /// The wired platform under test.
    pub platform: Platform,
    _dir: TempDir,
}

/// Build a platform on a fresh local mirror, without demo seeding.
pub fn test_platform() -> TestPlatform {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = PlatformConfig::default();
    config.store.data_dir = dir.path().to_path_buf();
    config.seed_demo_data = false;
    config.energy.region_prices.insert("SP".into(), 0.45);

    let platform = Platform::build(&config).expect("platform build");
    TestPlatform {
        platform,
        _dir: dir,
    }
}

/// A plain account with the given balances.
pub fn account(id: &str, role: UserRole, balance: f64, points: u64) -> UserAccount {
    UserAccount {
        id: id.to_string(),
        rev: 0,
        name: id.to_string(),
        role,
        balance,
        points,
        total_recycled_kg: 0.0,
        region: "SP".into(),
        producer: None,
        consumer: None,
    }
}

/// A producer account with empty metrics.
pub fn producer(id: &str) -> UserAccount {
    let mut user = account(id, UserRole::Producer, 0.0, 0);
    user.producer = Some(ProducerMetrics::default());
    user
}

/// A consumer account holding one pending bill.
pub fn consumer(id: &str, balance: f64) -> UserAccount {
    let mut user = account(id, UserRole::Consumer, balance, 0);
    user.consumer = Some(ConsumerMetrics {
        current_bill: Some(EnergyBill {
            original_value: 120.0,
            due_date: 1_790_000_000_000,
            status: BillStatus::Pending,
            fee_leg_settled: false,
            payout_leg_settled: false,
        }),
    });
    user
}

/// Insert accounts into the platform's store.
pub async fn insert_accounts(platform: &Platform, accounts: &[UserAccount]) {
    for user in accounts {
        platform
            .ledger
            .users()
            .insert(user)
            .await
            .expect("insert account");
    }
}
