//! Community Reports Engine - reports, supporters, sightings.

use eco_01_persistence::{DocumentGateway, Repository};
use serde_json::json;
use shared_types::{EcoError, EcoResult, EntityId, GeoLocation, Report, Sighting, TimestampMillis};
use std::sync::Arc;
use tracing::{debug, info};

/// Fields a reporter supplies when filing an incident.
#[derive(Debug, Clone)]
pub struct NewReport {
    /// Reporting account id.
    pub reporter_id: String,
    /// Incident category (e.g. "ILLEGAL_DUMPING").
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Incident location.
    pub location: GeoLocation,
    /// Creation time, for display ordering only.
    pub created_at: TimestampMillis,
}

/// Report creation and evidence-support counters.
pub struct CommunityReportsEngine {
    reports: Repository<Report>,
    sightings: Repository<Sighting>,
}

impl CommunityReportsEngine {
    /// Build the engine over the given store.
    #[must_use]
    pub fn new(gateway: Arc<dyn DocumentGateway>) -> Self {
        Self {
            reports: Repository::new(gateway.clone()),
            sightings: Repository::new(gateway),
        }
    }

    /// The report repository, for list views at the contract boundary.
    #[must_use]
    pub fn reports(&self) -> Repository<Report> {
        self.reports.clone()
    }

    /// The sighting repository, for list views at the contract boundary.
    #[must_use]
    pub fn sightings(&self) -> Repository<Sighting> {
        self.sightings.clone()
    }

    /// File a report with a fresh `REP-` id and no supporters.
    pub async fn create_report(&self, new: NewReport) -> EcoResult<Report> {
        if new.description.is_empty() {
            return Err(EcoError::ValidationError(
                "report description must not be empty".into(),
            ));
        }

        let report = Report {
            id: EntityId::Report.mint(),
            rev: 0,
            reporter_id: new.reporter_id,
            category: new.category,
            description: new.description,
            location: new.location,
            supporters: Vec::new(),
            created_at: new.created_at,
        };
        let stored = self.reports.insert(&report).await?;
        info!(id = %stored.id, reporter = %stored.reporter_id, category = %stored.category, "Report filed");
        Ok(stored)
    }

    /// Add a user to the report's supporter list. One support per account;
    /// a repeat support is a no-op that returns the current report.
    pub async fn support_report(&self, report_id: &str, user_id: &str) -> EcoResult<Report> {
        let report = self.reports.require(report_id).await?;
        if report.supporters.iter().any(|s| s == user_id) {
            return Ok(report);
        }

        let mut supporters = report.supporters.clone();
        supporters.push(user_id.to_string());
        let updated = self
            .reports
            .patch(report_id, json!({ "supporters": supporters }), Some(report.rev))
            .await?;
        debug!(report = report_id, user = user_id, supporters = updated.supporters.len(), "Report supported");
        Ok(updated)
    }

    /// Attach a witness sighting (`WIT-` id) to a report.
    pub async fn add_sighting(
        &self,
        report_id: &str,
        witness_id: &str,
        note: &str,
        created_at: TimestampMillis,
    ) -> EcoResult<Sighting> {
        // The report must exist before evidence can reference it.
        self.reports.require(report_id).await?;

        let sighting = Sighting {
            id: EntityId::Sighting.mint(),
            rev: 0,
            report_id: report_id.to_string(),
            witness_id: witness_id.to_string(),
            note: note.to_string(),
            created_at,
        };
        let stored = self.sightings.insert(&sighting).await?;
        debug!(id = %stored.id, report = report_id, witness = witness_id, "Sighting added");
        Ok(stored)
    }
}
