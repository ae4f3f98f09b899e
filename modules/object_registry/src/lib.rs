//! Object Registry Module
//!
//! Water-resource infrastructure objects grouped by region, resource type
//! and water type, with a derived priority score kept in sync on every save
//! and spreadsheet bulk export/import.

// Public exports
pub mod contract;
pub use contract::{
    client::ObjectRegistryApi, error::RegistryError, ImportReport, InfrastructureObject,
    ObjectFields, PriorityLevel, PriorityRecord, RecomputeOutcome, ReferenceItem, ReferenceKind,
    RowError, TabularExport,
};

pub mod config;
pub use config::{Config, TabularFormat};

pub mod module;
pub use module::ObjectRegistryModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
