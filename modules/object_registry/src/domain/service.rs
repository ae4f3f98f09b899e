//! Domain service - business logic orchestration

use crate::config::Config;
use crate::contract::{
    ImportReport, InfrastructureObject, ObjectFields, PriorityRecord, RecomputeOutcome,
    ReferenceItem, ReferenceKind, RegistryError, RowError, TabularExport,
};
use super::clock::Clock;
use super::priority::{calculate_priority_score, classify};
use super::repository::{ObjectRepository, PriorityRepository, ReferenceRepository};
use super::tabular::{self, Cell, CodecSet};
use super::validation::{validate_name, validate_object_fields};
use chrono::NaiveDate;
use std::sync::Arc;

/// How an imported row was applied
enum RowOutcome {
    Created,
    Updated,
}

/// Domain service for the object registry
pub struct Service {
    references: Arc<dyn ReferenceRepository>,
    objects: Arc<dyn ObjectRepository>,
    priorities: Arc<dyn PriorityRepository>,
    codecs: CodecSet,
    clock: Arc<dyn Clock>,
    formula_version: String,
    reject_future_passport_dates: bool,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        references: Arc<dyn ReferenceRepository>,
        objects: Arc<dyn ObjectRepository>,
        priorities: Arc<dyn PriorityRepository>,
        codecs: CodecSet,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        Self {
            references,
            objects,
            priorities,
            codecs,
            clock,
            formula_version: config.formula_version.clone(),
            reject_future_passport_dates: config.reject_future_passport_dates,
        }
    }

    // ===== Reference Operations =====

    pub async fn list_references(
        &self,
        kind: ReferenceKind,
    ) -> Result<Vec<ReferenceItem>, RegistryError> {
        self.references.list_all(kind).await.map_err(internal)
    }

    pub async fn get_reference(
        &self,
        kind: ReferenceKind,
        id: i32,
    ) -> Result<ReferenceItem, RegistryError> {
        self.references
            .find_by_id(kind, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| RegistryError::not_found(kind.as_str(), id))
    }

    pub async fn create_reference(
        &self,
        kind: ReferenceKind,
        name: &str,
    ) -> Result<ReferenceItem, RegistryError> {
        let name = validate_name("name", name)?;
        let item = self.references.create(kind, &name).await.map_err(internal)?;
        tracing::info!(kind = kind.as_str(), id = item.id, "Reference created");
        Ok(item)
    }

    pub async fn rename_reference(
        &self,
        kind: ReferenceKind,
        id: i32,
        name: &str,
    ) -> Result<ReferenceItem, RegistryError> {
        let name = validate_name("name", name)?;
        self.references
            .rename(kind, id, &name)
            .await
            .map_err(internal)?
            .ok_or_else(|| RegistryError::not_found(kind.as_str(), id))
    }

    /// Delete a reference entity; dependent objects are deleted with it
    pub async fn delete_reference(&self, kind: ReferenceKind, id: i32) -> Result<(), RegistryError> {
        if !self.references.delete(kind, id).await.map_err(internal)? {
            return Err(RegistryError::not_found(kind.as_str(), id));
        }
        tracing::info!(kind = kind.as_str(), id, "Reference deleted with dependent objects");
        Ok(())
    }

    // ===== Object Operations =====

    pub async fn list_objects(&self) -> Result<Vec<InfrastructureObject>, RegistryError> {
        self.objects.list_all().await.map_err(internal)
    }

    pub async fn get_object(&self, id: i32) -> Result<InfrastructureObject, RegistryError> {
        self.objects
            .find_by_id(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| RegistryError::not_found("object", id))
    }

    pub async fn create_object(
        &self,
        fields: ObjectFields,
    ) -> Result<InfrastructureObject, RegistryError> {
        let fields = self.prepare_fields(fields).await?;
        let object = self.save(&fields, None).await?;
        tracing::info!(object_id = object.id, "Object created");
        Ok(object)
    }

    /// Replace every writable field of an existing object
    pub async fn update_object(
        &self,
        id: i32,
        fields: ObjectFields,
    ) -> Result<InfrastructureObject, RegistryError> {
        let fields = self.prepare_fields(fields).await?;
        let previous = self.get_object(id).await?;
        let object = self.save(&fields, Some(&previous)).await?;
        tracing::info!(object_id = id, "Object updated");
        Ok(object)
    }

    pub async fn delete_object(&self, id: i32) -> Result<(), RegistryError> {
        if !self.objects.delete(id).await.map_err(internal)? {
            return Err(RegistryError::not_found("object", id));
        }
        tracing::info!(object_id = id, "Object deleted");
        Ok(())
    }

    // ===== Priority Operations =====

    pub async fn get_priority(&self, object_id: i32) -> Result<PriorityRecord, RegistryError> {
        self.priorities
            .find_by_object(object_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| RegistryError::not_found("priority_record", object_id))
    }

    pub async fn list_priorities(&self) -> Result<Vec<PriorityRecord>, RegistryError> {
        self.priorities.list_all().await.map_err(internal)
    }

    /// Recompute an existing object's priority as of today
    pub async fn recompute_by_id(&self, object_id: i32) -> Result<RecomputeOutcome, RegistryError> {
        let object = self.get_object(object_id).await?;
        self.recompute_and_sync(&object, self.clock.today()).await
    }

    /// Score and classify the object, then store the result on its priority
    /// record and on the object's cached priority field.
    ///
    /// The cached field is written through `set_priority`, which never routes
    /// back into [`Service::after_save`].
    pub async fn recompute_and_sync(
        &self,
        object: &InfrastructureObject,
        reference_date: NaiveDate,
    ) -> Result<RecomputeOutcome, RegistryError> {
        let score = calculate_priority_score(object, Some(reference_date));
        let level = classify(score);

        self.priorities
            .upsert_for_object(object.id, score, level, &self.formula_version, self.clock.now())
            .await
            .map_err(internal)?;

        self.objects
            .set_priority(object.id, score)
            .await
            .map_err(internal)?;

        tracing::debug!(object_id = object.id, score, level = %level, "Priority recomputed");

        Ok(RecomputeOutcome {
            object_id: object.id,
            score,
            level,
        })
    }

    // ===== Bulk Transfer =====

    /// Snapshot every object into the configured export format
    pub async fn export_all(&self) -> Result<TabularExport, RegistryError> {
        let objects = self.list_objects().await?;

        let mut grid = Vec::with_capacity(objects.len() + 1);
        grid.push(tabular::header_row());
        grid.extend(objects.iter().map(tabular::object_row));

        let codec = self.codecs.export();
        let bytes = codec.encode(&grid).map_err(internal)?;
        tracing::info!(rows = objects.len(), format = codec.extension(), "Objects exported");

        Ok(TabularExport {
            content_type: codec.content_type(),
            file_name: format!("objects.{}", codec.extension()),
            bytes,
        })
    }

    /// Import a tabular payload row by row.
    ///
    /// An unreadable payload or a wrong header rejects the whole batch before
    /// any write. Past that point a failing row is recorded and skipped.
    pub async fn import_batch(&self, payload: &[u8]) -> Result<ImportReport, RegistryError> {
        let codec = self
            .codecs
            .for_payload(payload)
            .ok_or_else(|| RegistryError::InvalidPayload {
                message: "unrecognized spreadsheet format".to_string(),
            })?;

        let grid = codec.decode(payload).map_err(|e| {
            tracing::warn!(error = %e, "Rejected unreadable import payload");
            RegistryError::InvalidPayload {
                message: e.to_string(),
            }
        })?;

        tabular::check_header(grid.first().map(Vec::as_slice))?;

        let mut report = ImportReport::default();
        for (index, row) in grid.iter().enumerate().skip(1) {
            if tabular::is_blank_row(row) {
                continue;
            }
            let row_number = index + 1;
            match self.import_row(row).await {
                Ok(RowOutcome::Created) => report.created += 1,
                Ok(RowOutcome::Updated) => report.updated += 1,
                Err(message) => {
                    tracing::warn!(row = row_number, %message, "Import row rejected");
                    report.errors.push(RowError {
                        row: row_number,
                        message,
                    });
                }
            }
        }

        tracing::info!(
            created = report.created,
            updated = report.updated,
            failed = report.errors.len(),
            "Import finished"
        );
        Ok(report)
    }

    async fn import_row(&self, row: &[Cell]) -> Result<RowOutcome, String> {
        let parsed = tabular::parse_row(row)?;
        let mut fields = self.prepare_fields(parsed.fields).await.map_err(row_message)?;

        let (object, outcome) = match parsed.id {
            Some(id) => {
                let existing = self
                    .objects
                    .find_by_id(id)
                    .await
                    .map_err(|e| row_message(internal(e)))?
                    .ok_or_else(|| format!("object {} not found", id))?;
                // Documents are never re-materialized from a sheet
                fields.document = existing.document.clone();
                let object = self
                    .save(&fields, Some(&existing))
                    .await
                    .map_err(row_message)?;
                (object, RowOutcome::Updated)
            }
            None => {
                let object = self.save(&fields, None).await.map_err(row_message)?;
                (object, RowOutcome::Created)
            }
        };

        if object.priority != parsed.priority {
            tracing::debug!(
                object_id = object.id,
                sheet = parsed.priority,
                computed = object.priority,
                "Imported priority replaced by computed score"
            );
        }
        Ok(outcome)
    }

    // ===== Helper Methods =====

    /// Write the fields, inserting when `previous` is `None`, then run the
    /// post-write hook. A failed hook reverts the write, so a failed save
    /// leaves the object and its priority as they were.
    async fn save(
        &self,
        fields: &ObjectFields,
        previous: Option<&InfrastructureObject>,
    ) -> Result<InfrastructureObject, RegistryError> {
        let object = match previous {
            Some(previous) => self
                .objects
                .update(previous.id, fields)
                .await
                .map_err(internal)?
                .ok_or_else(|| RegistryError::not_found("object", previous.id))?,
            None => self.objects.insert(fields).await.map_err(internal)?,
        };

        let id = object.id;
        match self.after_save(object).await {
            Ok(object) => Ok(object),
            Err(err) => {
                if let Err(revert_err) = self.revert(id, previous).await {
                    tracing::error!(object_id = id, error = %revert_err, "Failed to revert object write");
                } else {
                    tracing::warn!(object_id = id, "Object write reverted after priority sync failure");
                }
                Err(err)
            }
        }
    }

    async fn revert(
        &self,
        id: i32,
        previous: Option<&InfrastructureObject>,
    ) -> Result<(), RegistryError> {
        match previous {
            None => {
                self.objects.delete(id).await.map_err(internal)?;
            }
            Some(previous) => {
                self.objects
                    .update(id, &ObjectFields::from(previous))
                    .await
                    .map_err(internal)?;
                self.recompute_and_sync(previous, self.clock.today()).await?;
            }
        }
        Ok(())
    }

    /// Post-write hook, run exactly once per logical save
    async fn after_save(
        &self,
        mut object: InfrastructureObject,
    ) -> Result<InfrastructureObject, RegistryError> {
        let outcome = self.recompute_and_sync(&object, self.clock.today()).await?;
        object.priority = outcome.score;
        Ok(object)
    }

    /// Validate writable fields and check every referenced entity exists
    async fn prepare_fields(&self, fields: ObjectFields) -> Result<ObjectFields, RegistryError> {
        let fields = validate_object_fields(
            fields,
            self.clock.today(),
            self.reject_future_passport_dates,
        )?;

        for (kind, id) in [
            (ReferenceKind::Region, fields.region_id),
            (ReferenceKind::ResourceType, fields.resource_type_id),
            (ReferenceKind::WaterType, fields.water_type_id),
        ] {
            if self
                .references
                .find_by_id(kind, id)
                .await
                .map_err(internal)?
                .is_none()
            {
                return Err(RegistryError::validation(format!(
                    "{} {} does not exist",
                    kind.as_str(),
                    id
                )));
            }
        }

        Ok(fields)
    }
}

fn internal(error: anyhow::Error) -> RegistryError {
    tracing::error!("Internal error: {:?}", error);
    RegistryError::Internal
}

fn row_message(error: RegistryError) -> String {
    match error {
        RegistryError::Validation { message } => message,
        other => other.to_string(),
    }
}
