//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use crate::contract::{InfrastructureObject, PriorityLevel, PriorityRecord, ReferenceItem};
use crate::domain::validation::COORDINATE_SCALE;
use super::entity;

// ===== Reference Conversions =====

impl From<entity::region::Model> for ReferenceItem {
    fn from(entity: entity::region::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

impl From<entity::resource_type::Model> for ReferenceItem {
    fn from(entity: entity::resource_type::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

impl From<entity::water_type::Model> for ReferenceItem {
    fn from(entity: entity::water_type::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

// ===== Object Conversions =====

impl From<entity::object::Model> for InfrastructureObject {
    fn from(entity: entity::object::Model) -> Self {
        // Some backends hand decimals back through floating point
        let coordinate = |value: Option<rust_decimal::Decimal>| {
            value.map(|d| d.round_dp(COORDINATE_SCALE).normalize())
        };

        Self {
            id: entity.id,
            name: entity.name,
            region_id: entity.region_id,
            resource_type_id: entity.resource_type_id,
            water_type_id: entity.water_type_id,
            fauna: entity.fauna,
            passport_date: entity.passport_date,
            technical_condition: entity.technical_condition,
            latitude: coordinate(entity.latitude),
            longitude: coordinate(entity.longitude),
            document: entity.document,
            priority: entity.priority,
            created_at: entity.created_at,
        }
    }
}

// ===== Priority Record Conversions =====

impl TryFrom<entity::priority_record::Model> for PriorityRecord {
    type Error = anyhow::Error;

    fn try_from(entity: entity::priority_record::Model) -> Result<Self, Self::Error> {
        let level = PriorityLevel::parse(&entity.level).ok_or_else(|| {
            anyhow::anyhow!(
                "priority record {} has unknown level '{}'",
                entity.id,
                entity.level
            )
        })?;

        Ok(Self {
            id: entity.id,
            object_id: entity.object_id,
            score: entity.score,
            level,
            formula_version: entity.formula_version,
            updated_at: entity.updated_at,
        })
    }
}
