//! # eco-08-collaborators
//!
//! Collaborator interfaces consumed by the core.
//!
//! The generative weight/price estimator and the route optimizer are
//! external systems; the core only depends on the ports defined here.
//! Both degrade gracefully: the estimator falls back to a deterministic
//! estimate derived from input length and never blocks indefinitely, and
//! route optimization is purely advisory, and any failure leaves the
//! original order.

pub mod estimator;
pub mod route;

pub use estimator::{Estimate, Estimator, FallbackEstimator, GuardedEstimator};
pub use route::{optimize_or_identity, IdentityRoute, RouteOptimizer};
