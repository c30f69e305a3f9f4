use chrono::{DateTime, NaiveDate, Utc};

/// Source of "today" for date validation
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current civil date in the calendar's timezone
    fn today(&self) -> NaiveDate;
}
