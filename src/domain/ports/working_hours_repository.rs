use crate::domain::entities::WorkingHours;
use crate::domain::errors::CalendarResult;
use chrono::NaiveDate;

/// Storage for per-user working hours schedules
#[async_trait::async_trait]
pub trait WorkingHoursRepository: Send + Sync {
    /// Insert the schedule unless another schedule of the same owner overlaps
    /// its effective range. The check and the write are one statement.
    /// Returns whether the row was written.
    async fn insert_schedule_exclusive(&self, schedule: &WorkingHours) -> CalendarResult<bool>;

    /// Replace the stored schedule with the same id, under the same overlap
    /// guard (the record itself excluded). Returns whether the row was written.
    async fn update_schedule_exclusive(&self, schedule: &WorkingHours) -> CalendarResult<bool>;

    async fn get_schedule(&self, id: &str) -> CalendarResult<Option<WorkingHours>>;

    /// Schedules of `user_id` whose range intersects `[from, to)`
    /// (`to = None` means unbounded), optionally excluding one id
    async fn find_overlapping_schedules(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: Option<NaiveDate>,
        exclude_id: Option<&str>,
    ) -> CalendarResult<Vec<WorkingHours>>;

    /// Schedules of `user_id` (all users when `None`) optionally restricted
    /// to those effective on `active_on`, latest `effective_from` first
    async fn list_schedules(
        &self,
        user_id: Option<&str>,
        active_on: Option<NaiveDate>,
    ) -> CalendarResult<Vec<WorkingHours>>;

    /// Returns whether a row was deleted
    async fn delete_schedule(&self, id: &str) -> CalendarResult<bool>;
}
