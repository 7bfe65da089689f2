//! # Demo Seed
//!
//! Populates an empty store with the demo marketplace: one account per
//! role, an approved declaration waiting for a collector, and a pair of
//! causes. Skipped whenever the store already holds users, so a restarted
//! process never duplicates state.

use crate::container::Platform;
use eco_01_persistence::Repository;
use shared_types::{
    BillStatus, Cause, ConsumerMetrics, DeclarationStatus, EcoResult, EnergyBill, EntityId,
    GeoLocation, MaterialDeclaration, ProducerMetrics, UserAccount, UserRole,
};
use tracing::info;

/// Seed the demo data set if the store is empty. Returns whether seeding
/// ran.
pub async fn seed_demo_data(platform: &Platform) -> EcoResult<bool> {
    let users: Repository<UserAccount> = Repository::new(platform.gateway.clone());
    if !users.all().await?.is_empty() {
        return Ok(false);
    }

    for account in demo_accounts() {
        users.insert(&account).await?;
    }

    let declarations: Repository<MaterialDeclaration> = Repository::new(platform.gateway.clone());
    declarations.insert(&demo_declaration()).await?;

    let causes: Repository<Cause> = Repository::new(platform.gateway.clone());
    for cause in demo_causes() {
        causes.insert(&cause).await?;
    }

    info!("Demo data seeded");
    Ok(true)
}

fn account(id: &str, name: &str, role: UserRole, balance: f64, points: u64, kg: f64) -> UserAccount {
    UserAccount {
        id: id.into(),
        rev: 0,
        name: name.into(),
        role,
        balance,
        points,
        total_recycled_kg: kg,
        region: "SP".into(),
        producer: None,
        consumer: None,
    }
}

fn demo_accounts() -> Vec<UserAccount> {
    let mut producer = account("u_producer", "Solar Rooftop Co-op", UserRole::Producer, 0.0, 0, 0.0);
    producer.producer = Some(ProducerMetrics::default());

    let mut consumer = account("u_consumer", "Bakery on 5th", UserRole::Consumer, 80.0, 0, 0.0);
    consumer.consumer = Some(ConsumerMetrics {
        current_bill: Some(EnergyBill {
            original_value: 120.0,
            due_date: 1_790_000_000_000,
            status: BillStatus::Pending,
            fee_leg_settled: false,
            payout_leg_settled: false,
        }),
    });

    vec![
        account("u_resident", "Joao Silva", UserRole::Resident, 50.0, 120, 12.5),
        account("u_collector", "Carlos Motoboy", UserRole::Collector, 142.5, 0, 45.0),
        account("u_point", "EcoPoint Central", UserRole::Point, 1250.0, 0, 1200.0),
        producer,
        consumer,
    ]
}

fn demo_declaration() -> MaterialDeclaration {
    MaterialDeclaration {
        id: EntityId::Declaration.mint(),
        rev: 0,
        resident_id: "u_resident".into(),
        material: "PET".into(),
        quantity: 1,
        estimated_weight: 8.0,
        estimated_value: 14.40,
        location: GeoLocation {
            address: "Rua das Flores, 55".into(),
            lat: -23.55,
            lng: -46.63,
        },
        status: DeclarationStatus::Approved,
        collector_id: None,
        point_id: None,
        actual_weight: None,
    }
}

fn demo_causes() -> Vec<Cause> {
    vec![
        Cause {
            id: EntityId::Cause.mint(),
            rev: 0,
            title: "River cleanup brigade".into(),
            jackpot_points: 1850,
            target_points: 5000,
            voters_count: 37,
        },
        Cause {
            id: EntityId::Cause.mint(),
            rev: 0,
            title: "Community composting hub".into(),
            jackpot_points: 410,
            target_points: 2000,
            voters_count: 12,
        },
    ]
}
