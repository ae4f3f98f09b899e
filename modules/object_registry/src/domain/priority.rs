//! Priority scoring and classification
//!
//! Score = (6 - technical_condition) * 3 + passport age in whole years, clamped at 0.

use crate::contract::{InfrastructureObject, PriorityLevel};
use chrono::{Datelike, Local, NaiveDate};

/// Score at or above which an object is HIGH priority
pub const HIGH_THRESHOLD: i32 = 12;

/// Score at or above which an object is MEDIUM priority
pub const MEDIUM_THRESHOLD: i32 = 6;

/// Whole years elapsed between the passport date and the reference date.
///
/// Negative when the passport is dated after the reference date.
pub fn passport_age_years(passport_date: NaiveDate, reference_date: NaiveDate) -> i64 {
    let mut age = i64::from(reference_date.year()) - i64::from(passport_date.year());
    if (reference_date.month(), reference_date.day()) < (passport_date.month(), passport_date.day())
    {
        age -= 1;
    }
    age
}

/// Raw formula over the two scoring inputs
pub fn score_for(technical_condition: i32, passport_date: NaiveDate, reference_date: NaiveDate) -> i32 {
    let condition_term = (6 - i64::from(technical_condition)) * 3;
    let score = (condition_term + passport_age_years(passport_date, reference_date)).max(0);
    i32::try_from(score).unwrap_or(i32::MAX)
}

/// Compute the priority score of an object.
///
/// `reference_date` defaults to the local calendar date.
pub fn calculate_priority_score(
    object: &InfrastructureObject,
    reference_date: Option<NaiveDate>,
) -> i32 {
    let reference_date = reference_date.unwrap_or_else(|| Local::now().date_naive());
    score_for(object.technical_condition, object.passport_date, reference_date)
}

/// Map a score onto its risk band
pub fn classify(score: i32) -> PriorityLevel {
    if score >= HIGH_THRESHOLD {
        PriorityLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        PriorityLevel::Medium
    } else {
        PriorityLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn object(technical_condition: i32, passport_date: NaiveDate) -> InfrastructureObject {
        InfrastructureObject {
            id: 1,
            name: "Kapshagay dam".to_string(),
            region_id: 1,
            resource_type_id: 1,
            water_type_id: 1,
            fauna: true,
            passport_date,
            technical_condition,
            latitude: None,
            longitude: None,
            document: None,
            priority: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_age_counts_whole_years_only() {
        let today = date(2024, 6, 15);
        assert_eq!(passport_age_years(date(2014, 6, 15), today), 10);
        assert_eq!(passport_age_years(date(2014, 6, 16), today), 9);
        assert_eq!(passport_age_years(date(2014, 7, 1), today), 9);
        assert_eq!(passport_age_years(date(2014, 1, 1), today), 10);
        assert_eq!(passport_age_years(today, today), 0);
    }

    #[test]
    fn test_future_passport_gives_negative_age() {
        assert_eq!(passport_age_years(date(2026, 6, 15), date(2024, 6, 15)), -2);
    }

    #[test]
    fn test_leap_day_passport() {
        assert_eq!(passport_age_years(date(2020, 2, 29), date(2021, 2, 28)), 0);
        assert_eq!(passport_age_years(date(2020, 2, 29), date(2021, 3, 1)), 1);
    }

    #[test]
    fn test_fresh_passport_good_condition_is_low() {
        let today = date(2024, 6, 15);
        let score = calculate_priority_score(&object(5, today), Some(today));
        assert_eq!(score, 3);
        assert_eq!(classify(score), PriorityLevel::Low);
    }

    #[test]
    fn test_old_passport_critical_condition_is_high() {
        let today = date(2024, 6, 15);
        let score = calculate_priority_score(&object(1, date(2014, 6, 15)), Some(today));
        assert_eq!(score, 25);
        assert_eq!(classify(score), PriorityLevel::High);
    }

    #[test]
    fn test_condition_six_clamps_at_zero() {
        let today = date(2024, 6, 15);
        let score = calculate_priority_score(&object(6, today), Some(today));
        assert_eq!(score, 0);
        assert_eq!(classify(score), PriorityLevel::Low);
    }

    #[test]
    fn test_negative_raw_score_is_clamped() {
        let today = date(2024, 6, 15);
        assert_eq!(score_for(9, today, today), 0);
        assert_eq!(score_for(5, date(2030, 1, 1), today), 0);
    }

    #[test]
    fn test_formula_matches_for_valid_inputs() {
        let today = date(2024, 6, 15);
        for condition in 1..=5 {
            for years in 0..=40 {
                let passport = date(2024 - years, 3, 1);
                let expected = (6 - condition) * 3 + years;
                assert_eq!(score_for(condition, passport, today), expected);
            }
        }
    }

    #[test]
    fn test_default_reference_date_is_today() {
        let today = Local::now().date_naive();
        assert_eq!(
            calculate_priority_score(&object(4, today), None),
            calculate_priority_score(&object(4, today), Some(today))
        );
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify(12), PriorityLevel::High);
        assert_eq!(classify(11), PriorityLevel::Medium);
        assert_eq!(classify(6), PriorityLevel::Medium);
        assert_eq!(classify(5), PriorityLevel::Low);
        assert_eq!(classify(0), PriorityLevel::Low);
        assert_eq!(classify(i32::MAX), PriorityLevel::High);
    }
}
