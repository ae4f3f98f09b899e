//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== Reference DTOs =====

/// Region, resource type or water type
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReferenceDto {
    pub id: i32,

    #[schema(example = "Almaty region")]
    pub name: String,
}

/// Create or rename request for a reference entity
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReferenceRequest {
    #[schema(example = "Almaty region")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReferenceListResponse {
    pub items: Vec<ReferenceDto>,
    pub total: usize,
}

// ===== Object DTOs =====

/// Water-resource object
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ObjectDto {
    pub id: i32,

    #[schema(example = "Kapshagay dam")]
    pub name: String,

    pub region_id: i32,
    pub resource_type_id: i32,
    pub water_type_id: i32,
    pub fauna: bool,

    #[schema(example = "2015-06-01")]
    pub passport_date: NaiveDate,

    /// 0 (not assessed) to 5
    pub technical_condition: i32,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>, example = 43.8756)]
    pub latitude: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>, example = 77.0712)]
    pub longitude: Option<Decimal>,

    /// Stored passport document name
    pub pdf: Option<String>,

    /// Cached priority score
    pub priority: i32,

    pub created_at: DateTime<Utc>,
}

/// Create or full-replace request for an object
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ObjectRequest {
    #[schema(example = "Kapshagay dam")]
    pub name: String,

    pub region_id: i32,
    pub resource_type_id: i32,
    pub water_type_id: i32,

    #[serde(default = "default_fauna")]
    pub fauna: bool,

    #[schema(example = "2015-06-01")]
    pub passport_date: NaiveDate,

    #[serde(default)]
    pub technical_condition: i32,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub latitude: Option<Decimal>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub longitude: Option<Decimal>,

    #[serde(default)]
    pub pdf: Option<String>,
}

fn default_fauna() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ObjectListResponse {
    pub items: Vec<ObjectDto>,
    pub total: usize,
}

// ===== Priority DTOs =====

/// Priority detail record of one object
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriorityRecordDto {
    pub id: i32,
    pub object_id: i32,
    pub score: i32,

    #[schema(example = "HIGH")]
    pub level: String,

    #[schema(example = "v1")]
    pub formula_version: String,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriorityListResponse {
    pub items: Vec<PriorityRecordDto>,
    pub total: usize,
}

/// Result of an on-demand recompute
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecomputeResponse {
    pub object_id: i32,
    pub new_score: i32,

    #[schema(example = "MEDIUM")]
    pub level: String,

    #[schema(example = "ok")]
    pub status: String,
}

// ===== Bulk Transfer DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RowErrorDto {
    /// 1-based sheet row, the header being row 1
    pub row: usize,
    pub error: String,
}

/// Aggregate result of an import
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportResultDto {
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<RowErrorDto>,
}
