//! # Route Optimizer Port
//!
//! Reorders a collector's pickup route. Purely advisory: a failing
//! optimizer, or one returning something that is not a permutation of the
//! input indices, is ignored and the original order stands.

use async_trait::async_trait;
use shared_types::{EcoResult, GeoLocation};
use tracing::warn;

/// Route optimizer collaborator.
#[async_trait]
pub trait RouteOptimizer: Send + Sync {
    /// Propose a visiting order as indices into `locations`.
    async fn optimize(&self, locations: &[GeoLocation]) -> EcoResult<Vec<usize>>;
}

/// Degraded optimizer: keeps the original order.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRoute;

#[async_trait]
impl RouteOptimizer for IdentityRoute {
    async fn optimize(&self, locations: &[GeoLocation]) -> EcoResult<Vec<usize>> {
        Ok((0..locations.len()).collect())
    }
}

/// Ask the optimizer for an order, falling back to the identity order on
/// failure or on a reply that is not a permutation of `0..len`.
pub async fn optimize_or_identity<O: RouteOptimizer>(
    optimizer: &O,
    locations: &[GeoLocation],
) -> Vec<usize> {
    let identity: Vec<usize> = (0..locations.len()).collect();
    match optimizer.optimize(locations).await {
        Ok(order) if is_permutation(&order, locations.len()) => order,
        Ok(order) => {
            warn!(?order, expected = locations.len(), "Optimizer reply is not a permutation; keeping original order");
            identity
        }
        Err(e) => {
            warn!(error = %e, "Route optimizer failed; keeping original order");
            identity
        }
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &index in order {
        if index >= len || seen[index] {
            return false;
        }
        seen[index] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::EcoError;

    fn locations(n: usize) -> Vec<GeoLocation> {
        (0..n)
            .map(|i| GeoLocation {
                address: format!("Stop {i}"),
                lat: i as f64,
                lng: -(i as f64),
            })
            .collect()
    }

    struct ReversingOptimizer;

    #[async_trait]
    impl RouteOptimizer for ReversingOptimizer {
        async fn optimize(&self, locations: &[GeoLocation]) -> EcoResult<Vec<usize>> {
            Ok((0..locations.len()).rev().collect())
        }
    }

    struct BrokenOptimizer;

    #[async_trait]
    impl RouteOptimizer for BrokenOptimizer {
        async fn optimize(&self, _locations: &[GeoLocation]) -> EcoResult<Vec<usize>> {
            Err(EcoError::BackendUnavailable("optimizer down".into()))
        }
    }

    struct LyingOptimizer;

    #[async_trait]
    impl RouteOptimizer for LyingOptimizer {
        async fn optimize(&self, _locations: &[GeoLocation]) -> EcoResult<Vec<usize>> {
            Ok(vec![0, 0, 1])
        }
    }

    #[tokio::test]
    async fn test_valid_reordering_is_used() {
        let stops = locations(3);
        let order = optimize_or_identity(&ReversingOptimizer, &stops).await;
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[tokio::test]
    async fn test_failure_keeps_original_order() {
        let stops = locations(4);
        let order = optimize_or_identity(&BrokenOptimizer, &stops).await;
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_non_permutation_is_rejected() {
        let stops = locations(3);
        let order = optimize_or_identity(&LyingOptimizer, &stops).await;
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_identity_route() {
        let stops = locations(2);
        let order = IdentityRoute.optimize(&stops).await.unwrap();
        assert_eq!(order, vec![0, 1]);
    }
}
