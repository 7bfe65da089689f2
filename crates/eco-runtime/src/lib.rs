//! # eco-runtime
//!
//! Platform runtime for EcoCash: configuration, telemetry, backend
//! selection, and the container that wires every engine to the one store
//! chosen at startup.

pub mod config;
pub mod container;
pub mod seed;
pub mod telemetry;

pub use config::PlatformConfig;
pub use container::Platform;
