//! Contract models for the object registry
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Lookup tables an object references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Region,
    ResourceType,
    WaterType,
}

impl ReferenceKind {
    /// Resource name used in errors and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::ResourceType => "resource_type",
            Self::WaterType => "water_type",
        }
    }
}

/// Named lookup entity (region, resource type or water type)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceItem {
    pub id: i32,
    pub name: String,
}

/// Water-resource infrastructure object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfrastructureObject {
    pub id: i32,
    pub name: String,
    pub region_id: i32,
    pub resource_type_id: i32,
    pub water_type_id: i32,
    /// Whether fauna is present in the water body
    pub fauna: bool,
    pub passport_date: NaiveDate,
    /// 1 (good) to 5 (critical) in practice, 0 when not assessed
    pub technical_condition: i32,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    /// Stored name of the attached passport document
    pub document: Option<String>,
    /// Last computed priority score, cached for fast reads
    pub priority: i32,
    pub created_at: DateTime<Utc>,
}

/// Writable object fields, used for both create and full update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectFields {
    pub name: String,
    pub region_id: i32,
    pub resource_type_id: i32,
    pub water_type_id: i32,
    pub fauna: bool,
    pub passport_date: NaiveDate,
    pub technical_condition: i32,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    pub document: Option<String>,
}

impl From<&InfrastructureObject> for ObjectFields {
    fn from(object: &InfrastructureObject) -> Self {
        Self {
            name: object.name.clone(),
            region_id: object.region_id,
            resource_type_id: object.resource_type_id,
            water_type_id: object.water_type_id,
            fauna: object.fauna,
            passport_date: object.passport_date,
            technical_condition: object.technical_condition,
            latitude: object.latitude,
            longitude: object.longitude,
            document: object.document.clone(),
        }
    }
}

/// Ordinal risk level derived from a priority score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
}

impl PriorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority detail record, exactly one per object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityRecord {
    pub id: i32,
    pub object_id: i32,
    pub score: i32,
    pub level: PriorityLevel,
    /// Formula revision that produced the score
    pub formula_version: String,
    pub updated_at: DateTime<Utc>,
}

/// Result of a priority recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomputeOutcome {
    pub object_id: i32,
    pub score: i32,
    pub level: PriorityLevel,
}

/// Per-row import failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based sheet row (the header is row 1)
    pub row: usize,
    pub message: String,
}

/// Aggregate result of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<RowError>,
}

/// Serialized export produced by a tabular codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularExport {
    pub content_type: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}
