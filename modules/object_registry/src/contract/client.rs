//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules use to interact with the registry.
//! NO HTTP - direct function calls.

use super::{
    error::RegistryError,
    model::{
        ImportReport, InfrastructureObject, ObjectFields, PriorityRecord, RecomputeOutcome,
        ReferenceItem, ReferenceKind, TabularExport,
    },
};
use async_trait::async_trait;

/// Object registry API for inter-module communication
#[async_trait]
pub trait ObjectRegistryApi: Send + Sync {
    // ===== Reference Operations =====

    async fn list_references(&self, kind: ReferenceKind)
        -> Result<Vec<ReferenceItem>, RegistryError>;

    async fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<ReferenceItem, RegistryError>;

    /// Delete a reference entity together with every object that uses it
    async fn delete_reference(&self, kind: ReferenceKind, id: i32) -> Result<(), RegistryError>;

    // ===== Object Operations =====

    async fn get_object(&self, id: i32) -> Result<InfrastructureObject, RegistryError>;

    async fn list_objects(&self) -> Result<Vec<InfrastructureObject>, RegistryError>;

    async fn create_object(
        &self,
        fields: ObjectFields,
    ) -> Result<InfrastructureObject, RegistryError>;

    async fn update_object(
        &self,
        id: i32,
        fields: ObjectFields,
    ) -> Result<InfrastructureObject, RegistryError>;

    async fn delete_object(&self, id: i32) -> Result<(), RegistryError>;

    // ===== Priority Operations =====

    async fn get_priority(&self, object_id: i32) -> Result<PriorityRecord, RegistryError>;

    /// Recompute the priority of an existing object as of today
    async fn recompute_priority(&self, object_id: i32) -> Result<RecomputeOutcome, RegistryError>;

    // ===== Bulk Transfer =====

    async fn export_objects(&self) -> Result<TabularExport, RegistryError>;

    async fn import_objects(&self, payload: &[u8]) -> Result<ImportReport, RegistryError>;
}
