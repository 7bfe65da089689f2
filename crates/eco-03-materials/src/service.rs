//! Material Lifecycle Engine - declaration state machine over the gateway.

use crate::domain::{check_acceptable, check_weighable, liquidation_shares, rescale_value};
use eco_01_persistence::{DocumentGateway, Repository};
use eco_02_ledger::LedgerService;
use serde_json::json;
use shared_types::{
    DeclarationStatus, EcoError, EcoResult, EntityId, GeoLocation, MaterialDeclaration,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Fields a resident supplies when declaring material. The estimated weight
/// usually comes from the Estimator collaborator; the engine only sees
/// numbers.
#[derive(Debug, Clone)]
pub struct NewDeclaration {
    /// Owning resident's account id.
    pub resident_id: String,
    /// Material type (e.g. "PET").
    pub material: String,
    /// Declared quantity in items or units.
    pub quantity: u32,
    /// Estimated weight in kg.
    pub estimated_weight: f64,
    /// Estimated value in currency units.
    pub estimated_value: f64,
    /// Pickup location.
    pub location: GeoLocation,
}

/// State machine for recyclable-material declarations.
pub struct MaterialLifecycleEngine {
    declarations: Repository<MaterialDeclaration>,
    ledger: Arc<LedgerService>,
}

impl MaterialLifecycleEngine {
    /// Build the engine over the given store and ledger.
    #[must_use]
    pub fn new(gateway: Arc<dyn DocumentGateway>, ledger: Arc<LedgerService>) -> Self {
        Self {
            declarations: Repository::new(gateway),
            ledger,
        }
    }

    /// The declaration repository, for list views at the contract boundary.
    #[must_use]
    pub fn declarations(&self) -> Repository<MaterialDeclaration> {
        self.declarations.clone()
    }

    /// Create a declaration in `Pending` with a fresh `ECO-` id.
    pub async fn create_declaration(&self, new: NewDeclaration) -> EcoResult<MaterialDeclaration> {
        if !new.estimated_weight.is_finite() || new.estimated_weight <= 0.0 {
            return Err(EcoError::ValidationError(
                "estimated weight must be positive".into(),
            ));
        }
        if !new.estimated_value.is_finite() || new.estimated_value < 0.0 {
            return Err(EcoError::ValidationError(
                "estimated value must not be negative".into(),
            ));
        }
        if new.quantity == 0 {
            return Err(EcoError::ValidationError("quantity must be positive".into()));
        }

        let declaration = MaterialDeclaration {
            id: EntityId::Declaration.mint(),
            rev: 0,
            resident_id: new.resident_id,
            material: new.material,
            quantity: new.quantity,
            estimated_weight: new.estimated_weight,
            estimated_value: new.estimated_value,
            location: new.location,
            status: DeclarationStatus::Pending,
            collector_id: None,
            point_id: None,
            actual_weight: None,
        };
        let stored = self.declarations.insert(&declaration).await?;
        info!(id = %stored.id, resident = %stored.resident_id, material = %stored.material, "Declaration created");
        Ok(stored)
    }

    /// A collector takes the declaration. Legal from `Pending` or
    /// `Approved`.
    pub async fn accept_by_collector(
        &self,
        declaration_id: &str,
        collector_id: &str,
    ) -> EcoResult<MaterialDeclaration> {
        let declaration = self.declarations.require(declaration_id).await?;
        check_acceptable(declaration_id, declaration.status)?;

        let updated = self
            .declarations
            .patch(
                declaration_id,
                json!({
                    "status": DeclarationStatus::CollectorAssigned,
                    "collector_id": collector_id,
                }),
                Some(declaration.rev),
            )
            .await?;
        debug!(id = declaration_id, collector = collector_id, "Collector assigned");
        Ok(updated)
    }

    /// The collector weighs the material. Locks the final value by
    /// re-scaling the estimate to the weighed mass.
    pub async fn confirm_weight(
        &self,
        declaration_id: &str,
        actual_weight: f64,
    ) -> EcoResult<MaterialDeclaration> {
        if !actual_weight.is_finite() || actual_weight <= 0.0 {
            return Err(EcoError::ValidationError(
                "actual weight must be positive".into(),
            ));
        }

        let declaration = self.declarations.require(declaration_id).await?;
        check_weighable(declaration_id, declaration.status)?;

        let locked_value = rescale_value(
            declaration.estimated_value,
            declaration.estimated_weight,
            actual_weight,
        );
        let updated = self
            .declarations
            .patch(
                declaration_id,
                json!({
                    "status": DeclarationStatus::Collected,
                    "actual_weight": actual_weight,
                    "estimated_value": locked_value,
                }),
                Some(declaration.rev),
            )
            .await?;
        debug!(
            id = declaration_id,
            actual_weight,
            locked_value,
            "Weight confirmed, value locked"
        );
        Ok(updated)
    }

    /// A point of sale liquidates the declaration: 70% to the resident,
    /// 30% to the collector when one is assigned, both legs fronted by the
    /// point's own account. Terminal.
    pub async fn liquidate_at_point(
        &self,
        point_id: &str,
        declaration_id: &str,
    ) -> EcoResult<MaterialDeclaration> {
        let declaration = self.declarations.require(declaration_id).await?;
        if declaration.status == DeclarationStatus::Completed {
            return Err(EcoError::AlreadySettled(declaration_id.to_string()));
        }

        let (resident_share, collector_share) = liquidation_shares(declaration.estimated_value);

        self.ledger
            .transfer(point_id, &declaration.resident_id, resident_share)
            .await?;
        if let Some(collector_id) = &declaration.collector_id {
            self.ledger
                .transfer(point_id, collector_id, collector_share)
                .await?;
        }

        let updated = self
            .declarations
            .patch(
                declaration_id,
                json!({
                    "status": DeclarationStatus::Completed,
                    "point_id": point_id,
                }),
                Some(declaration.rev),
            )
            .await?;

        // Credit the resident's recycled-mass tally with the weighed mass.
        let recycled = declaration
            .actual_weight
            .unwrap_or(declaration.estimated_weight);
        let resident = self.ledger.account(&declaration.resident_id).await?;
        self.ledger
            .users()
            .patch(
                &declaration.resident_id,
                json!({ "total_recycled_kg": resident.total_recycled_kg + recycled }),
                Some(resident.rev),
            )
            .await?;

        info!(
            id = declaration_id,
            point = point_id,
            resident_share,
            collector_share,
            "Declaration liquidated"
        );
        Ok(updated)
    }
}
