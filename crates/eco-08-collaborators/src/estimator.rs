//! # Estimator Port
//!
//! The generative estimator turns a free-text description and a category
//! into an estimated weight with a justification. The implementation is an
//! external collaborator; the core calls through [`GuardedEstimator`], which
//! bounds the call with a timeout and substitutes the deterministic
//! fallback on any failure.

use async_trait::async_trait;
use shared_types::{EcoError, EcoResult};
use std::time::Duration;
use tracing::warn;

/// An estimate produced for a material or service description.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// Estimated weight in kg (or price, for service estimates).
    pub weight: f64,
    /// Short human-readable justification.
    pub justification: String,
}

/// Generative weight/price estimator.
#[async_trait]
pub trait Estimator: Send + Sync {
    /// Estimate from a non-empty description and a category.
    async fn estimate(&self, description: &str, category: &str) -> EcoResult<Estimate>;
}

/// Deterministic fallback estimator.
///
/// Derives the weight from the description length alone so repeated calls
/// with the same input agree: one base kilogram plus a tenth per ten
/// characters, capped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEstimator;

/// Upper bound of the fallback estimate, in kg.
const FALLBACK_CAP_KG: f64 = 15.0;

impl FallbackEstimator {
    fn derive(description: &str) -> Estimate {
        let weight = (1.0 + (description.chars().count() / 10) as f64 * 0.1).min(FALLBACK_CAP_KG);
        Estimate {
            weight,
            justification: "Default estimate based on description volume".into(),
        }
    }
}

#[async_trait]
impl Estimator for FallbackEstimator {
    async fn estimate(&self, description: &str, _category: &str) -> EcoResult<Estimate> {
        if description.is_empty() {
            return Err(EcoError::ValidationError(
                "estimator requires a non-empty description".into(),
            ));
        }
        Ok(Self::derive(description))
    }
}

/// Wraps a real estimator with a timeout and the deterministic fallback,
/// so a slow or failing collaborator never blocks the declaration flow.
pub struct GuardedEstimator<E> {
    inner: E,
    timeout: Duration,
}

impl<E: Estimator> GuardedEstimator<E> {
    /// Guard `inner` with the given call timeout.
    pub fn new(inner: E, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Estimate, degrading to the fallback on timeout or failure. Input
    /// validation errors are not degraded; an empty description is the
    /// caller's mistake, not the collaborator's.
    pub async fn estimate(&self, description: &str, category: &str) -> EcoResult<Estimate> {
        if description.is_empty() {
            return Err(EcoError::ValidationError(
                "estimator requires a non-empty description".into(),
            ));
        }

        match tokio::time::timeout(self.timeout, self.inner.estimate(description, category)).await
        {
            Ok(Ok(estimate)) => Ok(estimate),
            Ok(Err(e)) => {
                warn!(error = %e, "Estimator failed; using fallback");
                Ok(FallbackEstimator::derive(description))
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "Estimator timed out; using fallback");
                Ok(FallbackEstimator::derive(description))
            }
        }
    }
}
