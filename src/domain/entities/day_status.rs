use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Holiday, TimeOff, WorkingHours};

/// Working/holiday/time-off verdict for one user on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub is_working_day: bool,
    pub is_holiday: bool,
    pub is_time_off: bool,
    pub holiday_name: Option<String>,
    pub time_off_id: Option<String>,
}

impl DayStatus {
    /// Combine the three lookups into a verdict. Without a schedule the day
    /// is never a working day.
    pub fn resolve(
        date: NaiveDate,
        weekday_enabled: Option<bool>,
        holiday_name: Option<String>,
        time_off_id: Option<String>,
    ) -> Self {
        let is_holiday = holiday_name.is_some();
        let is_time_off = time_off_id.is_some();
        Self {
            date,
            is_working_day: weekday_enabled.unwrap_or(false) && !is_holiday && !is_time_off,
            is_holiday,
            is_time_off,
            holiday_name,
            time_off_id,
        }
    }
}

/// Day status together with the schedule that applied
#[derive(Debug, Clone, Serialize)]
pub struct WorkingDayCheck {
    pub user_id: String,
    #[serde(flatten)]
    pub status: DayStatus,
    pub working_hours: Option<WorkingHours>,
}

/// Current schedule plus what is coming up for a user
#[derive(Debug, Clone, Serialize)]
pub struct UserWorkSchedule {
    pub user_id: String,
    pub current_working_hours: Option<WorkingHours>,
    pub weekly_hours: i64,
    pub upcoming_holidays: Vec<Holiday>,
    pub pending_time_off: Vec<TimeOff>,
    pub approved_time_off: Vec<TimeOff>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 21).unwrap()
    }

    #[test]
    fn test_holiday_or_time_off_is_never_working() {
        let s = DayStatus::resolve(date(), Some(true), Some("Nowruz".into()), None);
        assert!(!s.is_working_day && s.is_holiday);

        let s = DayStatus::resolve(date(), Some(true), None, Some("t1".into()));
        assert!(!s.is_working_day && s.is_time_off);

        let s = DayStatus::resolve(date(), Some(true), None, None);
        assert!(s.is_working_day);
    }

    #[test]
    fn test_no_schedule_means_not_working() {
        let s = DayStatus::resolve(date(), None, None, None);
        assert!(!s.is_working_day);
        assert!(!s.is_holiday && !s.is_time_off);
    }

    #[test]
    fn test_serialized_shape() {
        let s = DayStatus::resolve(date(), Some(true), None, Some("t1".into()));
        assert_eq!(
            serde_json::to_value(&s).unwrap(),
            json!({
                "date": "2024-03-21",
                "is_working_day": false,
                "is_holiday": false,
                "is_time_off": true,
                "holiday_name": null,
                "time_off_id": "t1"
            })
        );
    }
}
