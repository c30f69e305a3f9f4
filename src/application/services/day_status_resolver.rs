use crate::application::services::schedule_registry::{select_active, ScheduleRegistry};
use crate::domain::entities::{
    CalendarType, DayStatus, Holiday, TimeOff, TimeOffFilter, TimeOffStatus, UserWorkSchedule,
    WorkingDayCheck,
};
use crate::domain::errors::{CalendarError, CalendarResult};
use crate::domain::ports::{Clock, HolidayRepository, TimeOffRepository, WorkingHoursRepository};
use chrono::{Datelike, Days, NaiveDate};
use std::collections::HashMap;
use std::sync::Arc;

/// How far `next_working_day` looks before giving up
pub const NEXT_WORKING_DAY_LOOKAHEAD: u64 = 14;

/// Holiday name to report for a date. Named holidays win over the weekly
/// rest day when both fall on the same date.
fn holiday_names(holidays: &[Holiday]) -> HashMap<NaiveDate, String> {
    let mut names: HashMap<NaiveDate, (bool, String)> = HashMap::new();
    for h in holidays {
        let weekly = h.calendar_type == CalendarType::Weekly;
        match names.get(&h.date) {
            Some((existing_weekly, _)) if !*existing_weekly || weekly => {}
            _ => {
                names.insert(h.date, (weekly, h.name.clone()));
            }
        }
    }
    names.into_iter().map(|(d, (_, name))| (d, name)).collect()
}

fn covering_request(time_off: &[TimeOff], date: NaiveDate) -> Option<String> {
    time_off
        .iter()
        .find(|t| t.covers(date))
        .map(|t| t.id.clone())
}

/// Combines schedules, holidays and approved time off into day verdicts
#[derive(Clone)]
pub struct DayStatusResolver {
    holiday_repo: Arc<dyn HolidayRepository>,
    schedule_repo: Arc<dyn WorkingHoursRepository>,
    time_off_repo: Arc<dyn TimeOffRepository>,
    schedules: ScheduleRegistry,
    clock: Arc<dyn Clock>,
}

impl DayStatusResolver {
    pub fn new(
        holiday_repo: Arc<dyn HolidayRepository>,
        schedule_repo: Arc<dyn WorkingHoursRepository>,
        time_off_repo: Arc<dyn TimeOffRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            holiday_repo,
            schedules: ScheduleRegistry::new(schedule_repo.clone()),
            schedule_repo,
            time_off_repo,
            clock,
        }
    }

    pub async fn check(&self, user_id: &str, date: NaiveDate) -> CalendarResult<DayStatus> {
        Ok(self.check_detailed(user_id, date).await?.status)
    }

    /// Day status together with the schedule it was resolved against
    pub async fn check_detailed(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> CalendarResult<WorkingDayCheck> {
        let schedule = self.schedules.active_for(user_id, date).await?;
        let holidays = self.holiday_repo.list_holidays_between(date, date).await?;
        let approved = self
            .time_off_repo
            .list_approved_between(user_id, date, date)
            .await?;

        let status = DayStatus::resolve(
            date,
            schedule
                .as_ref()
                .map(|s| s.weekdays.is_enabled(date.weekday())),
            holiday_names(&holidays).remove(&date),
            covering_request(&approved, date),
        );

        Ok(WorkingDayCheck {
            user_id: user_id.to_string(),
            status,
            working_hours: schedule,
        })
    }

    /// One status per day of `[start, end]`, ascending
    pub async fn range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<Vec<DayStatus>> {
        if start > end {
            return Err(CalendarError::invalid_range(start, end));
        }

        let holidays = holiday_names(&self.holiday_repo.list_holidays_between(start, end).await?);
        let approved = self
            .time_off_repo
            .list_approved_between(user_id, start, end)
            .await?;
        let schedules = self.schedule_repo.list_schedules(Some(user_id), None).await?;

        let days = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| {
                DayStatus::resolve(
                    date,
                    select_active(&schedules, date).map(|s| s.weekdays.is_enabled(date.weekday())),
                    holidays.get(&date).cloned(),
                    covering_request(&approved, date),
                )
            })
            .collect();

        Ok(days)
    }

    pub async fn count_working_days(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CalendarResult<usize> {
        let days = self.range(user_id, start, end).await?;
        Ok(days.iter().filter(|d| d.is_working_day).count())
    }

    /// First working day strictly after `after`, within the look-ahead window
    pub async fn next_working_day(
        &self,
        user_id: &str,
        after: NaiveDate,
    ) -> CalendarResult<Option<NaiveDate>> {
        let (Some(start), Some(end)) = (
            after.succ_opt(),
            after.checked_add_days(Days::new(NEXT_WORKING_DAY_LOOKAHEAD)),
        ) else {
            return Ok(None);
        };

        let days = self.range(user_id, start, end).await?;
        Ok(days.into_iter().find(|d| d.is_working_day).map(|d| d.date))
    }

    /// Current schedule plus holidays and time off in the next `days_ahead` days
    pub async fn work_schedule(
        &self,
        user_id: &str,
        days_ahead: u64,
    ) -> CalendarResult<UserWorkSchedule> {
        let today = self.clock.today();
        let horizon = today
            .checked_add_days(Days::new(days_ahead))
            .ok_or_else(|| CalendarError::invalid_input("days_ahead", "too far ahead"))?;

        let current = self.schedules.active_for(user_id, today).await?;
        let weekly_hours = current
            .as_ref()
            .map_or(0, |s| self.schedules.weekly_hours(s));
        let upcoming_holidays = self.holiday_repo.list_holidays_between(today, horizon).await?;

        // Requests already under way still count as upcoming
        let in_window = |t: &TimeOff| t.end_date >= today && t.start_date <= horizon;
        let with_status = |status| TimeOffFilter::for_user(user_id).with_status(status);
        let mut pending_time_off = self
            .time_off_repo
            .list_time_off(&with_status(TimeOffStatus::Pending))
            .await?;
        let mut approved_time_off = self
            .time_off_repo
            .list_time_off(&with_status(TimeOffStatus::Approved))
            .await?;
        pending_time_off.retain(in_window);
        approved_time_off.retain(in_window);

        Ok(UserWorkSchedule {
            user_id: user_id.to_string(),
            current_working_hours: current,
            weekly_hours,
            upcoming_holidays,
            pending_time_off,
            approved_time_off,
        })
    }
}
