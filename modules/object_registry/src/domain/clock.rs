//! Source of the reference date used for priority scoring

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Supplies "today" and "now" to the domain service
pub trait Clock: Send + Sync {
    /// Calendar date used as the reference date for passport age
    fn today(&self) -> NaiveDate;

    /// Timestamp written on priority records
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall clock in the server's local time zone
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date, for deterministic scoring
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
