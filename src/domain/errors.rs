use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::entities::TimeOffStatus;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Schedule overlaps existing schedule {existing_id} for user {user_id}")]
    OverlappingSchedule { user_id: String, existing_id: String },

    #[error("Time off overlaps existing request {existing_id} for user {user_id}")]
    OverlappingRequest { user_id: String, existing_id: String },

    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: String, end: String },

    #[error("Start date {0} is in the past")]
    PastDate(NaiveDate),

    #[error("Time off request {id} is {status}, expected pending")]
    InvalidState { id: String, status: TimeOffStatus },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Holiday '{name}' already exists on {date}")]
    DuplicateHoliday { name: String, date: NaiveDate },

    #[error("Invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl CalendarError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CalendarError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid_range(start: impl ToString, end: impl ToString) -> Self {
        CalendarError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        CalendarError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

impl From<sqlx::Error> for CalendarError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                CalendarError::Database(db_err.message().to_string())
            }
            other => CalendarError::Database(other.to_string()),
        }
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;
