//! Conversions between REST DTOs and contract models

use super::dto::*;
use crate::contract;

impl From<contract::ReferenceItem> for ReferenceDto {
    fn from(item: contract::ReferenceItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
        }
    }
}

impl From<contract::InfrastructureObject> for ObjectDto {
    fn from(object: contract::InfrastructureObject) -> Self {
        Self {
            id: object.id,
            name: object.name,
            region_id: object.region_id,
            resource_type_id: object.resource_type_id,
            water_type_id: object.water_type_id,
            fauna: object.fauna,
            passport_date: object.passport_date,
            technical_condition: object.technical_condition,
            latitude: object.latitude,
            longitude: object.longitude,
            pdf: object.document,
            priority: object.priority,
            created_at: object.created_at,
        }
    }
}

impl From<ObjectRequest> for contract::ObjectFields {
    fn from(req: ObjectRequest) -> Self {
        Self {
            name: req.name,
            region_id: req.region_id,
            resource_type_id: req.resource_type_id,
            water_type_id: req.water_type_id,
            fauna: req.fauna,
            passport_date: req.passport_date,
            technical_condition: req.technical_condition,
            latitude: req.latitude,
            longitude: req.longitude,
            document: req.pdf,
        }
    }
}

impl From<contract::PriorityRecord> for PriorityRecordDto {
    fn from(record: contract::PriorityRecord) -> Self {
        Self {
            id: record.id,
            object_id: record.object_id,
            score: record.score,
            level: record.level.to_string(),
            formula_version: record.formula_version,
            updated_at: record.updated_at,
        }
    }
}

impl From<contract::RecomputeOutcome> for RecomputeResponse {
    fn from(outcome: contract::RecomputeOutcome) -> Self {
        Self {
            object_id: outcome.object_id,
            new_score: outcome.score,
            level: outcome.level.to_string(),
            status: "ok".to_string(),
        }
    }
}

impl From<contract::ImportReport> for ImportResultDto {
    fn from(report: contract::ImportReport) -> Self {
        Self {
            created: report.created,
            updated: report.updated,
            errors: report
                .errors
                .into_iter()
                .map(|e| RowErrorDto {
                    row: e.row,
                    error: e.message,
                })
                .collect(),
        }
    }
}
