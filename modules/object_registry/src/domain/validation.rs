//! Boundary validation for object and reference writes
//!
//! The priority formula itself is total; these checks keep nonsensical input
//! out of storage before it ever reaches the formula.

use crate::contract::{ObjectFields, RegistryError};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Maximum length of object and reference names
pub const MAX_NAME_LEN: usize = 100;

/// Technical condition range accepted on writes (0 = not assessed)
pub const MIN_TECHNICAL_CONDITION: i32 = 0;
pub const MAX_TECHNICAL_CONDITION: i32 = 5;

/// Decimal places kept for coordinates
pub const COORDINATE_SCALE: u32 = 6;

/// Validate and trim a display name
pub fn validate_name(field: &str, name: &str) -> Result<String, RegistryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::validation(format!("{} cannot be empty", field)));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(RegistryError::validation(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a coordinate against its range and round it to storage precision
fn validate_coordinate(
    field: &str,
    value: Option<Decimal>,
    limit: i64,
) -> Result<Option<Decimal>, RegistryError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let limit = Decimal::from(limit);
    if value < -limit || value > limit {
        return Err(RegistryError::validation(format!(
            "{} {} is outside [-{}, {}]",
            field, value, limit, limit
        )));
    }
    Ok(Some(value.round_dp(COORDINATE_SCALE)))
}

/// Validate writable object fields, returning the normalized copy to persist.
///
/// Future passport dates are rejected when `reject_future_passport` is set;
/// `today` is the reference date the service scores with.
pub fn validate_object_fields(
    fields: ObjectFields,
    today: NaiveDate,
    reject_future_passport: bool,
) -> Result<ObjectFields, RegistryError> {
    let name = validate_name("name", &fields.name)?;

    if !(MIN_TECHNICAL_CONDITION..=MAX_TECHNICAL_CONDITION).contains(&fields.technical_condition) {
        return Err(RegistryError::validation(format!(
            "technical_condition {} is outside {}..={}",
            fields.technical_condition, MIN_TECHNICAL_CONDITION, MAX_TECHNICAL_CONDITION
        )));
    }

    if reject_future_passport && fields.passport_date > today {
        return Err(RegistryError::validation(format!(
            "passport_date {} is in the future",
            fields.passport_date
        )));
    }

    let latitude = validate_coordinate("latitude", fields.latitude, 90)?;
    let longitude = validate_coordinate("longitude", fields.longitude, 180)?;

    let document = fields
        .document
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(ObjectFields {
        name,
        latitude,
        longitude,
        document,
        ..fields
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn fields() -> ObjectFields {
        ObjectFields {
            name: "  Bartogay reservoir ".to_string(),
            region_id: 1,
            resource_type_id: 1,
            water_type_id: 1,
            fauna: false,
            passport_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            technical_condition: 3,
            latitude: Some(Decimal::from_str("43.2389491").unwrap()),
            longitude: Some(Decimal::from_str("76.8897").unwrap()),
            document: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_valid_fields_are_normalized() {
        let normalized = validate_object_fields(fields(), today(), true).unwrap();
        assert_eq!(normalized.name, "Bartogay reservoir");
        assert_eq!(normalized.latitude, Some(Decimal::from_str("43.238949").unwrap()));
        assert_eq!(normalized.document, None);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut f = fields();
        f.name = "   ".to_string();
        assert!(matches!(
            validate_object_fields(f, today(), true),
            Err(RegistryError::Validation { .. })
        ));
    }

    #[test]
    fn test_long_name_rejected() {
        assert!(validate_name("name", &"x".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name("name", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_technical_condition_range() {
        for condition in [0, 1, 5] {
            let mut f = fields();
            f.technical_condition = condition;
            assert!(validate_object_fields(f, today(), true).is_ok());
        }
        for condition in [-1, 6, 100] {
            let mut f = fields();
            f.technical_condition = condition;
            assert!(validate_object_fields(f, today(), true).is_err());
        }
    }

    #[test]
    fn test_future_passport_depends_on_flag() {
        let mut f = fields();
        f.passport_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(validate_object_fields(f.clone(), today(), true).is_err());
        assert!(validate_object_fields(f, today(), false).is_ok());
    }

    #[test]
    fn test_coordinates_out_of_range() {
        let mut f = fields();
        f.latitude = Some(Decimal::from(91));
        assert!(validate_object_fields(f, today(), true).is_err());

        let mut f = fields();
        f.longitude = Some(Decimal::from(-181));
        assert!(validate_object_fields(f, today(), true).is_err());

        let mut f = fields();
        f.latitude = None;
        f.longitude = None;
        assert!(validate_object_fields(f, today(), true).is_ok());
    }
}
