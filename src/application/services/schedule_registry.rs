use crate::domain::entities::{Actor, NewWorkingHours, WorkingHours, WorkingHoursUpdate};
use crate::domain::errors::{CalendarError, CalendarResult};
use crate::domain::ports::WorkingHoursRepository;
use chrono::{NaiveDate, NaiveTime, Timelike, Weekday};
use std::sync::Arc;

const MAX_HOURS_PER_DAY: i64 = 24;
const MAX_BREAK_MINUTES: i64 = 480;
const MAX_NOTES_LEN: usize = 1000;

/// Pick the schedule effective on `date`; ties go to the latest
/// `effective_from`
pub fn select_active(schedules: &[WorkingHours], date: NaiveDate) -> Option<&WorkingHours> {
    schedules
        .iter()
        .filter(|s| s.is_effective_on(date))
        .max_by_key(|s| s.effective_from)
}

fn whole_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

fn normalize(schedule: &mut WorkingHours) {
    schedule.start_time = whole_seconds(schedule.start_time);
    schedule.end_time = whole_seconds(schedule.end_time);
    schedule.break_start = schedule.break_start.map(whole_seconds);
    schedule.break_end = schedule.break_end.map(whole_seconds);
}

/// Field rules shared by create and update
pub fn validate_schedule(schedule: &WorkingHours) -> CalendarResult<()> {
    if schedule.end_time <= schedule.start_time {
        return Err(CalendarError::InvalidTimeRange(format!(
            "end_time {} must be after start_time {}",
            schedule.end_time, schedule.start_time
        )));
    }

    match (schedule.break_start, schedule.break_end) {
        (None, None) => {}
        (Some(break_start), Some(break_end)) => {
            if !(schedule.start_time < break_start
                && break_start < break_end
                && break_end < schedule.end_time)
            {
                return Err(CalendarError::InvalidTimeRange(format!(
                    "break {}-{} must lie strictly inside {}-{}",
                    break_start, break_end, schedule.start_time, schedule.end_time
                )));
            }
        }
        _ => {
            return Err(CalendarError::InvalidTimeRange(
                "break_start and break_end must be given together".to_string(),
            ));
        }
    }

    if let Some(to) = schedule.effective_to {
        if to <= schedule.effective_from {
            return Err(CalendarError::invalid_range(schedule.effective_from, to));
        }
    }

    if !(1..=MAX_HOURS_PER_DAY).contains(&schedule.work_hours_per_day) {
        return Err(CalendarError::invalid_input(
            "work_hours_per_day",
            format!("must be between 1 and {}", MAX_HOURS_PER_DAY),
        ));
    }
    if !(0..=MAX_BREAK_MINUTES).contains(&schedule.break_duration_minutes) {
        return Err(CalendarError::invalid_input(
            "break_duration_minutes",
            format!("must be between 0 and {}", MAX_BREAK_MINUTES),
        ));
    }
    if schedule
        .notes
        .as_ref()
        .is_some_and(|n| n.chars().count() > MAX_NOTES_LEN)
    {
        return Err(CalendarError::invalid_input(
            "notes",
            format!("must be at most {} characters", MAX_NOTES_LEN),
        ));
    }
    if schedule.timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(CalendarError::invalid_input(
            "timezone",
            format!("unknown timezone '{}'", schedule.timezone),
        ));
    }

    Ok(())
}

/// Per-user working hours with non-overlapping effective ranges
#[derive(Clone)]
pub struct ScheduleRegistry {
    schedule_repo: Arc<dyn WorkingHoursRepository>,
}

impl ScheduleRegistry {
    pub fn new(schedule_repo: Arc<dyn WorkingHoursRepository>) -> Self {
        Self { schedule_repo }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        schedule: NewWorkingHours,
    ) -> CalendarResult<WorkingHours> {
        let mut schedule = WorkingHours::new(schedule, &actor.user_id);
        normalize(&mut schedule);
        validate_schedule(&schedule)?;

        self.ensure_no_overlap(&schedule, None).await?;
        if !self.schedule_repo.insert_schedule_exclusive(&schedule).await? {
            return Err(self.overlap_error(&schedule, None).await);
        }

        Ok(schedule)
    }

    /// Merge a partial update over the stored schedule and re-validate it
    pub async fn update(
        &self,
        id: &str,
        update: WorkingHoursUpdate,
    ) -> CalendarResult<WorkingHours> {
        let current = self.get(id).await?;
        let mut schedule = current.merged(&update);
        normalize(&mut schedule);
        validate_schedule(&schedule)?;

        self.ensure_no_overlap(&schedule, Some(id)).await?;
        if !self.schedule_repo.update_schedule_exclusive(&schedule).await? {
            // Row vanished or a concurrent writer got in first
            if self.schedule_repo.get_schedule(id).await?.is_none() {
                return Err(CalendarError::not_found("WorkingHours", id));
            }
            return Err(self.overlap_error(&schedule, Some(id)).await);
        }

        Ok(schedule)
    }

    pub async fn delete(&self, id: &str) -> CalendarResult<()> {
        if !self.schedule_repo.delete_schedule(id).await? {
            return Err(CalendarError::not_found("WorkingHours", id));
        }
        tracing::info!("Working hours deleted: id={}", id);
        Ok(())
    }

    pub async fn get(&self, id: &str) -> CalendarResult<WorkingHours> {
        self.schedule_repo
            .get_schedule(id)
            .await?
            .ok_or_else(|| CalendarError::not_found("WorkingHours", id))
    }

    /// Latest `effective_from` first
    pub async fn list(
        &self,
        user_id: Option<&str>,
        active_on: Option<NaiveDate>,
    ) -> CalendarResult<Vec<WorkingHours>> {
        self.schedule_repo.list_schedules(user_id, active_on).await
    }

    pub async fn active_for(
        &self,
        user_id: &str,
        on_date: NaiveDate,
    ) -> CalendarResult<Option<WorkingHours>> {
        let schedules = self
            .schedule_repo
            .list_schedules(Some(user_id), Some(on_date))
            .await?;
        Ok(select_active(&schedules, on_date).cloned())
    }

    pub fn weekday_enabled(&self, schedule: &WorkingHours, weekday: Weekday) -> bool {
        schedule.weekdays.is_enabled(weekday)
    }

    /// Contracted hours over a full week
    pub fn weekly_hours(&self, schedule: &WorkingHours) -> i64 {
        schedule.weekdays.enabled_count() as i64 * schedule.work_hours_per_day
    }

    async fn ensure_no_overlap(
        &self,
        schedule: &WorkingHours,
        exclude_id: Option<&str>,
    ) -> CalendarResult<()> {
        let existing = self
            .schedule_repo
            .find_overlapping_schedules(
                &schedule.user_id,
                schedule.effective_from,
                schedule.effective_to,
                exclude_id,
            )
            .await?;

        match existing.first() {
            Some(other) => {
                tracing::warn!(
                    "Schedule for {} from {} overlaps {}",
                    schedule.user_id,
                    schedule.effective_from,
                    other.id
                );
                Err(CalendarError::OverlappingSchedule {
                    user_id: schedule.user_id.clone(),
                    existing_id: other.id.clone(),
                })
            }
            None => Ok(()),
        }
    }

    /// Error for a guarded write that was refused
    async fn overlap_error(&self, schedule: &WorkingHours, exclude_id: Option<&str>) -> CalendarError {
        match self.ensure_no_overlap(schedule, exclude_id).await {
            Err(err) => err,
            Ok(()) => CalendarError::Database(format!(
                "working hours {} was not written",
                schedule.id
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewWorkingHours;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn schedule() -> WorkingHours {
        WorkingHours::new(NewWorkingHours::new("u1", t(9, 0), t(17, 0), date(1, 1)), "admin")
    }

    #[test]
    fn test_end_must_follow_start() {
        let mut s = schedule();
        s.end_time = t(9, 0);
        assert!(matches!(
            validate_schedule(&s),
            Err(CalendarError::InvalidTimeRange(_))
        ));
    }

    #[test]
    fn test_break_must_sit_inside_the_day() {
        let mut s = schedule();
        s.break_start = Some(t(12, 0));
        s.break_end = Some(t(13, 0));
        assert!(validate_schedule(&s).is_ok());

        s.break_end = Some(t(17, 0));
        assert!(matches!(
            validate_schedule(&s),
            Err(CalendarError::InvalidTimeRange(_))
        ));

        s.break_end = None;
        assert!(matches!(
            validate_schedule(&s),
            Err(CalendarError::InvalidTimeRange(_))
        ));
    }

    #[test]
    fn test_empty_effective_range_is_rejected() {
        let mut s = schedule();
        s.effective_to = Some(date(1, 1));
        assert!(matches!(
            validate_schedule(&s),
            Err(CalendarError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_field_bounds() {
        let mut s = schedule();
        s.work_hours_per_day = 25;
        assert!(matches!(
            validate_schedule(&s),
            Err(CalendarError::InvalidInput { field: "work_hours_per_day", .. })
        ));

        let mut s = schedule();
        s.timezone = "Mars/Olympus".to_string();
        assert!(matches!(
            validate_schedule(&s),
            Err(CalendarError::InvalidInput { field: "timezone", .. })
        ));
    }

    #[test]
    fn test_latest_effective_from_wins() {
        let older = schedule();
        let mut newer = schedule();
        newer.effective_from = date(3, 1);

        let schedules = vec![older.clone(), newer.clone()];
        assert_eq!(select_active(&schedules, date(3, 5)).unwrap().id, newer.id);
        assert_eq!(select_active(&schedules, date(2, 5)).unwrap().id, older.id);
        assert!(select_active(&schedules, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()).is_none());
    }
}
