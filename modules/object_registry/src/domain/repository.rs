//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    InfrastructureObject, ObjectFields, PriorityLevel, PriorityRecord, ReferenceItem,
    ReferenceKind,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository for regions, resource types and water types
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    async fn create(&self, kind: ReferenceKind, name: &str) -> Result<ReferenceItem>;

    async fn find_by_id(&self, kind: ReferenceKind, id: i32) -> Result<Option<ReferenceItem>>;

    async fn list_all(&self, kind: ReferenceKind) -> Result<Vec<ReferenceItem>>;

    /// Rename an entry, `None` when it does not exist
    async fn rename(
        &self,
        kind: ReferenceKind,
        id: i32,
        name: &str,
    ) -> Result<Option<ReferenceItem>>;

    /// Delete an entry and, through storage cascades, every object using it.
    /// Returns false when nothing was deleted.
    async fn delete(&self, kind: ReferenceKind, id: i32) -> Result<bool>;
}

/// Repository for infrastructure objects
///
/// None of these writes recompute priority; that is the service's post-write hook.
#[async_trait]
pub trait ObjectRepository: Send + Sync {
    /// Insert with a zero priority; the caller recomputes it
    async fn insert(&self, fields: &ObjectFields) -> Result<InfrastructureObject>;

    /// Replace every writable field, `None` when the object does not exist
    async fn update(&self, id: i32, fields: &ObjectFields) -> Result<Option<InfrastructureObject>>;

    async fn find_by_id(&self, id: i32) -> Result<Option<InfrastructureObject>>;

    /// All objects ordered by id
    async fn list_all(&self) -> Result<Vec<InfrastructureObject>>;

    /// Hard delete; the priority record goes with it
    async fn delete(&self, id: i32) -> Result<bool>;

    /// Write back the cached priority score only
    async fn set_priority(&self, id: i32, score: i32) -> Result<()>;
}

/// Repository for per-object priority records
#[async_trait]
pub trait PriorityRepository: Send + Sync {
    /// Atomically create or overwrite the single record of an object
    async fn upsert_for_object(
        &self,
        object_id: i32,
        score: i32,
        level: PriorityLevel,
        formula_version: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<PriorityRecord>;

    async fn find_by_object(&self, object_id: i32) -> Result<Option<PriorityRecord>>;

    async fn list_all(&self) -> Result<Vec<PriorityRecord>>;
}
