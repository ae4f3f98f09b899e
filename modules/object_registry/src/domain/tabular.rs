//! Tabular exchange format for bulk export and import
//!
//! The header row is a compatibility contract: export writes exactly
//! [`HEADER`] and import refuses any sheet whose first row differs from it.

use crate::contract::{InfrastructureObject, ObjectFields, RegistryError};
use chrono::{NaiveDate, NaiveDateTime, SecondsFormat};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

/// Ordered export/import columns
pub const HEADER: [&str; 13] = [
    "id",
    "name",
    "region_id",
    "resource_type_id",
    "water_type_id",
    "fauna",
    "passport_date",
    "technical_condition",
    "latitude",
    "longitude",
    "pdf",
    "priority",
    "created_at",
];

const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_REGION: usize = 2;
const COL_RESOURCE_TYPE: usize = 3;
const COL_WATER_TYPE: usize = 4;
const COL_FAUNA: usize = 5;
const COL_PASSPORT_DATE: usize = 6;
const COL_TECHNICAL_CONDITION: usize = 7;
const COL_LATITUDE: usize = 8;
const COL_LONGITUDE: usize = 9;
const COL_PRIORITY: usize = 11;

/// A single spreadsheet cell, independent of the container format
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Display form used for header comparison and CSV output
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }
}

/// Rows of cells; the first row is the header
pub type Grid = Vec<Vec<Cell>>;

/// Build the header row
pub fn header_row() -> Vec<Cell> {
    HEADER.iter().map(|h| Cell::Text((*h).to_string())).collect()
}

/// Serialize one object into a row matching [`HEADER`]
pub fn object_row(object: &InfrastructureObject) -> Vec<Cell> {
    let coordinate = |value: Option<Decimal>| {
        value
            .and_then(|d| d.normalize().to_string().parse::<f64>().ok())
            .map(Cell::Float)
            .unwrap_or(Cell::Empty)
    };

    vec![
        Cell::Int(i64::from(object.id)),
        Cell::Text(object.name.clone()),
        Cell::Int(i64::from(object.region_id)),
        Cell::Int(i64::from(object.resource_type_id)),
        Cell::Int(i64::from(object.water_type_id)),
        Cell::Bool(object.fauna),
        Cell::Text(object.passport_date.format("%Y-%m-%d").to_string()),
        Cell::Int(i64::from(object.technical_condition)),
        coordinate(object.latitude),
        coordinate(object.longitude),
        Cell::Text(object.document.clone().unwrap_or_default()),
        Cell::Int(i64::from(object.priority)),
        Cell::Text(object.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    ]
}

/// Compare the first row against [`HEADER`] by exact position.
///
/// Trailing empty cells are not columns and are ignored.
pub fn check_header(row: Option<&[Cell]>) -> Result<(), RegistryError> {
    let mut found: Vec<String> = row
        .unwrap_or_default()
        .iter()
        .map(Cell::to_text)
        .collect();
    while found.last().is_some_and(|c| c.trim().is_empty()) {
        found.pop();
    }

    if found.iter().map(String::as_str).eq(HEADER.iter().copied()) {
        return Ok(());
    }

    Err(RegistryError::SchemaMismatch {
        expected: HEADER.iter().map(|h| (*h).to_string()).collect(),
        found,
    })
}

/// True when every cell of the row is empty
pub fn is_blank_row(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_empty)
}

/// Container format a [`Grid`] is exchanged in
pub trait TabularCodec: Send + Sync {
    /// MIME type of encoded payloads
    fn content_type(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// Whether the payload looks like this codec's container
    fn accepts(&self, payload: &[u8]) -> bool;

    fn encode(&self, grid: &[Vec<Cell>]) -> anyhow::Result<Vec<u8>>;

    /// Parse a payload into rows, `grid[i]` being sheet row `i + 1`.
    ///
    /// Errors mean the container itself is unreadable.
    fn decode(&self, payload: &[u8]) -> anyhow::Result<Grid>;
}

/// Codec used for export plus the codecs tried, in order, on import
#[derive(Clone)]
pub struct CodecSet {
    export: Arc<dyn TabularCodec>,
    import: Vec<Arc<dyn TabularCodec>>,
}

impl CodecSet {
    pub fn new(export: Arc<dyn TabularCodec>, import: Vec<Arc<dyn TabularCodec>>) -> Self {
        Self { export, import }
    }

    pub fn export(&self) -> &dyn TabularCodec {
        self.export.as_ref()
    }

    /// First import codec that recognizes the payload
    pub fn for_payload(&self, payload: &[u8]) -> Option<&dyn TabularCodec> {
        self.import
            .iter()
            .find(|codec| codec.accepts(payload))
            .map(|codec| codec.as_ref())
    }
}

/// Typed content of one data row, before reference resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// Existing object to replace; `None` creates a new one
    pub id: Option<i32>,
    pub fields: ObjectFields,
    pub priority: i32,
}

/// Coerce a data row into typed fields.
///
/// The `pdf` column is accepted but never materialized and `created_at`
/// is owned by storage, so both are skipped.
pub fn parse_row(row: &[Cell]) -> Result<ImportRow, String> {
    let cell = |index: usize| row.get(index).unwrap_or(&Cell::Empty);

    let id = optional_int(cell(COL_ID), HEADER[COL_ID])?;
    let name = match cell(COL_NAME) {
        Cell::Empty => String::new(),
        other => other.to_text(),
    };
    let region_id = required_int(cell(COL_REGION), HEADER[COL_REGION])?;
    let resource_type_id = required_int(cell(COL_RESOURCE_TYPE), HEADER[COL_RESOURCE_TYPE])?;
    let water_type_id = required_int(cell(COL_WATER_TYPE), HEADER[COL_WATER_TYPE])?;
    let fauna = to_bool(cell(COL_FAUNA), HEADER[COL_FAUNA])?;
    let passport_date = to_date(cell(COL_PASSPORT_DATE), HEADER[COL_PASSPORT_DATE])?;
    let technical_condition =
        optional_int(cell(COL_TECHNICAL_CONDITION), HEADER[COL_TECHNICAL_CONDITION])?.unwrap_or(0);
    let latitude = to_decimal(cell(COL_LATITUDE), HEADER[COL_LATITUDE])?;
    let longitude = to_decimal(cell(COL_LONGITUDE), HEADER[COL_LONGITUDE])?;
    let priority = optional_int(cell(COL_PRIORITY), HEADER[COL_PRIORITY])?.unwrap_or(0);

    Ok(ImportRow {
        id,
        fields: ObjectFields {
            name,
            region_id,
            resource_type_id,
            water_type_id,
            fauna,
            passport_date,
            technical_condition,
            latitude,
            longitude,
            document: None,
        },
        priority,
    })
}

fn optional_int(cell: &Cell, column: &str) -> Result<Option<i32>, String> {
    let value = match cell {
        c if c.is_empty() => return Ok(None),
        Cell::Int(i) => *i,
        Cell::Float(f) if f.fract() == 0.0 && f.is_finite() => *f as i64,
        Cell::Text(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(v) => v,
                Err(_) => match s.parse::<f64>() {
                    Ok(f) if f.fract() == 0.0 && f.is_finite() => f as i64,
                    _ => return Err(format!("{}: '{}' is not an integer", column, s)),
                },
            }
        }
        other => {
            return Err(format!(
                "{}: '{}' is not an integer",
                column,
                other.to_text()
            ))
        }
    };
    i32::try_from(value)
        .map(Some)
        .map_err(|_| format!("{}: {} is out of range", column, value))
}

fn required_int(cell: &Cell, column: &str) -> Result<i32, String> {
    optional_int(cell, column)?.ok_or_else(|| format!("{} is required", column))
}

fn to_bool(cell: &Cell, column: &str) -> Result<bool, String> {
    match cell {
        c if c.is_empty() => Ok(false),
        Cell::Bool(b) => Ok(*b),
        Cell::Int(i) => Ok(*i != 0),
        Cell::Float(f) => Ok(*f != 0.0),
        Cell::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            other => Err(format!("{}: '{}' is not a boolean", column, other)),
        },
        Cell::DateTime(_) => Err(format!("{}: a date is not a boolean", column)),
        Cell::Empty => Ok(false),
    }
}

fn to_date(cell: &Cell, column: &str) -> Result<NaiveDate, String> {
    match cell {
        c if c.is_empty() => Err(format!("{} is required", column)),
        Cell::DateTime(dt) => Ok(dt.date()),
        Cell::Text(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date())
                })
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
                })
                .map_err(|_| format!("{}: '{}' is not a date (expected YYYY-MM-DD)", column, s))
        }
        other => Err(format!("{}: '{}' is not a date", column, other.to_text())),
    }
}

fn to_decimal(cell: &Cell, column: &str) -> Result<Option<Decimal>, String> {
    match cell {
        c if c.is_empty() => Ok(None),
        Cell::Int(i) => Ok(Some(Decimal::from(*i))),
        Cell::Float(f) if f.is_finite() => Decimal::from_str(&f.to_string())
            .map(Some)
            .map_err(|_| format!("{}: {} is out of range", column, f)),
        Cell::Text(s) => Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .map(Some)
            .map_err(|_| format!("{}: '{}' is not a number", column, s.trim())),
        other => Err(format!("{}: '{}' is not a number", column, other.to_text())),
    }
}
