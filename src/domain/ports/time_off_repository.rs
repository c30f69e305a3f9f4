use crate::domain::entities::{TimeOff, TimeOffDecision, TimeOffFilter};
use crate::domain::errors::CalendarResult;
use chrono::NaiveDate;

/// Storage for time off requests
#[async_trait::async_trait]
pub trait TimeOffRepository: Send + Sync {
    /// Insert unless a pending/approved request of the same owner intersects
    /// `[start_date, end_date]`. Returns whether the row was written.
    async fn insert_time_off_exclusive(&self, time_off: &TimeOff) -> CalendarResult<bool>;

    /// Write dates and reason of an existing request under the same overlap
    /// guard (the request itself excluded). Returns whether the row was written.
    async fn update_time_off_exclusive(&self, time_off: &TimeOff) -> CalendarResult<bool>;

    async fn get_time_off(&self, id: &str) -> CalendarResult<Option<TimeOff>>;

    /// Pending/approved requests of `user_id` intersecting `[start, end]`
    async fn find_blocking_time_off(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<&str>,
    ) -> CalendarResult<Vec<TimeOff>>;

    /// Approved requests of `user_id` intersecting `[start, end]`
    async fn list_approved_between(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<Vec<TimeOff>>;

    /// Ordered by start date, latest first
    async fn list_time_off(&self, filter: &TimeOffFilter) -> CalendarResult<Vec<TimeOff>>;

    /// Record a decision only if the request is still pending.
    /// Returns whether the row was written.
    async fn decide_time_off(&self, id: &str, decision: &TimeOffDecision)
        -> CalendarResult<bool>;

    /// Returns whether a row was deleted
    async fn delete_time_off(&self, id: &str) -> CalendarResult<bool>;
}
