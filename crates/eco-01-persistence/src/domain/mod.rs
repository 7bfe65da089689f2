//! Domain logic of the persistence subsystem: document shape and merge rules.

pub mod document;
