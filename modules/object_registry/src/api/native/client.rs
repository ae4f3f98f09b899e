//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    ImportReport, InfrastructureObject, ObjectFields, ObjectRegistryApi, PriorityRecord,
    RecomputeOutcome, ReferenceItem, ReferenceKind, RegistryError, TabularExport,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client that calls the domain service directly, without HTTP
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ObjectRegistryApi for NativeClient {
    async fn list_references(
        &self,
        kind: ReferenceKind,
    ) -> Result<Vec<ReferenceItem>, RegistryError> {
        self.service.list_references(kind).await
    }

    async fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<ReferenceItem, RegistryError> {
        self.service.create_reference(kind, name).await
    }

    async fn delete_reference(&self, kind: ReferenceKind, id: i32) -> Result<(), RegistryError> {
        self.service.delete_reference(kind, id).await
    }

    async fn get_object(&self, id: i32) -> Result<InfrastructureObject, RegistryError> {
        self.service.get_object(id).await
    }

    async fn list_objects(&self) -> Result<Vec<InfrastructureObject>, RegistryError> {
        self.service.list_objects().await
    }

    async fn create_object(
        &self,
        fields: ObjectFields,
    ) -> Result<InfrastructureObject, RegistryError> {
        self.service.create_object(fields).await
    }

    async fn update_object(
        &self,
        id: i32,
        fields: ObjectFields,
    ) -> Result<InfrastructureObject, RegistryError> {
        self.service.update_object(id, fields).await
    }

    async fn delete_object(&self, id: i32) -> Result<(), RegistryError> {
        self.service.delete_object(id).await
    }

    async fn get_priority(&self, object_id: i32) -> Result<PriorityRecord, RegistryError> {
        self.service.get_priority(object_id).await
    }

    async fn recompute_priority(&self, object_id: i32) -> Result<RecomputeOutcome, RegistryError> {
        self.service.recompute_by_id(object_id).await
    }

    async fn export_objects(&self) -> Result<TabularExport, RegistryError> {
        self.service.export_all().await
    }

    async fn import_objects(&self, payload: &[u8]) -> Result<ImportReport, RegistryError> {
        self.service.import_batch(payload).await
    }
}
