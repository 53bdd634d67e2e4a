//! Time port

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current time and the user's current calendar date
pub trait Clock: Send + Sync {
    /// Timestamp for `created_at` fields
    fn now(&self) -> DateTime<Utc>;

    /// The calendar date the daily trend window ends on
    fn today(&self) -> NaiveDate;
}
