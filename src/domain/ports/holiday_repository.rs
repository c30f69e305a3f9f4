use crate::domain::entities::{Holiday, HolidayFilter};
use crate::domain::errors::CalendarResult;
use chrono::NaiveDate;

/// Storage for holiday records. (date, name) is unique.
#[async_trait::async_trait]
pub trait HolidayRepository: Send + Sync {
    async fn create_holiday(&self, holiday: &Holiday) -> CalendarResult<()>;

    /// Insert unless (date, name) already exists. Returns whether a row was written.
    async fn insert_holiday_if_absent(&self, holiday: &Holiday) -> CalendarResult<bool>;

    async fn get_holiday(&self, id: &str) -> CalendarResult<Option<Holiday>>;

    async fn find_holiday(&self, date: NaiveDate, name: &str) -> CalendarResult<Option<Holiday>>;

    /// Date-ordered
    async fn list_holidays(&self, filter: &HolidayFilter) -> CalendarResult<Vec<Holiday>>;

    /// Holidays with `start <= date <= end`, date-ordered
    async fn list_holidays_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<Vec<Holiday>>;

    /// First holiday strictly after `date`
    async fn next_holiday_after(&self, date: NaiveDate) -> CalendarResult<Option<Holiday>>;

    /// Returns whether a row was deleted
    async fn delete_holiday(&self, id: &str) -> CalendarResult<bool>;
}
