//! Ports of the persistence subsystem.

pub mod gateway;

pub use gateway::{DocumentGateway, Watch};
