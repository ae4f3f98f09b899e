//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::ObjectRegistryApi;
pub use error::RegistryError;
pub use model::{
    ImportReport, InfrastructureObject, ObjectFields, PriorityLevel, PriorityRecord,
    RecomputeOutcome, ReferenceItem, ReferenceKind, RowError, TabularExport,
};
